// ABOUTME: Integration tests for the subscription route handlers
// ABOUTME: Tests subscribe/unsubscribe flows, duplicate rejection, and payment injection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use common::{
    bearer, create_test_resources, create_test_resources_with_payments, create_test_trainer,
    create_test_user, DecliningPaymentProcessor,
};
use helpers::axum_test::AxumTestRequest;

use axum::http::StatusCode;
use axum::Router;
use fitplanhub::routes::app_router;
use serde_json::json;

async fn create_plan(router: &Router, token: &str, title: &str, price: f64) -> String {
    let response = AxumTestRequest::post("/api/plans")
        .header("authorization", &bearer(token))
        .json(&json!({
            "title": title,
            "description": format!("{title} description"),
            "price": price,
            "duration": 30
        }))
        .send(router.clone())
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json_value()["plan"]["_id"]
        .as_str()
        .unwrap()
        .to_owned()
}

// ============================================================================
// Subscribe Tests
// ============================================================================

#[tokio::test]
async fn test_subscribe_success() {
    let resources = create_test_resources().await.unwrap();
    let (_trainer, trainer_token) = create_test_trainer(&resources).await.unwrap();
    let (_user, user_token) = create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    let plan_id = create_plan(&router, &trainer_token, "Endurance Builder", 55.0).await;

    let response = AxumTestRequest::post(&format!("/api/subscriptions/{plan_id}"))
        .header("authorization", &bearer(&user_token))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body = response.json_value();
    assert_eq!(body["message"], "Successfully subscribed to plan");
    assert_eq!(body["subscription"]["plan"]["title"], "Endurance Builder");
    assert_eq!(
        body["subscription"]["plan"]["description"],
        "Endurance Builder description"
    );
    assert_eq!(body["subscription"]["payment"]["success"], true);
    assert_eq!(body["subscription"]["payment"]["amount"], 55.0);
    assert_eq!(body["subscription"]["payment"]["currency"], "USD");
    assert!(body["subscription"]["payment"]["transactionId"]
        .as_str()
        .unwrap()
        .starts_with("TXN"));
    assert!(body["subscription"]["subscribedAt"].is_string());
}

#[tokio::test]
async fn test_subscribe_duplicate_rejected() {
    let resources = create_test_resources().await.unwrap();
    let (_trainer, trainer_token) = create_test_trainer(&resources).await.unwrap();
    let (_user, user_token) = create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    let plan_id = create_plan(&router, &trainer_token, "Once Only", 20.0).await;

    let first = AxumTestRequest::post(&format!("/api/subscriptions/{plan_id}"))
        .header("authorization", &bearer(&user_token))
        .send(router.clone())
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = AxumTestRequest::post(&format!("/api/subscriptions/{plan_id}"))
        .header("authorization", &bearer(&user_token))
        .send(router)
        .await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        second.json_value()["error"],
        "You are already subscribed to this plan"
    );
}

#[tokio::test]
async fn test_subscribe_missing_plan() {
    let resources = create_test_resources().await.unwrap();
    let (_user, user_token) = create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post(&format!("/api/subscriptions/{}", uuid::Uuid::new_v4()))
        .header("authorization", &bearer(&user_token))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json_value()["error"], "Plan not found");
}

#[tokio::test]
async fn test_subscribe_declined_payment_leaves_no_subscription() {
    let resources = create_test_resources_with_payments(Arc::new(DecliningPaymentProcessor))
        .await
        .unwrap();
    let (_trainer, trainer_token) = create_test_trainer(&resources).await.unwrap();
    let (_user, user_token) = create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    let plan_id = create_plan(&router, &trainer_token, "Unaffordable", 999.0).await;

    let response = AxumTestRequest::post(&format!("/api/subscriptions/{plan_id}"))
        .header("authorization", &bearer(&user_token))
        .send(router.clone())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json_value()["error"], "Payment failed");

    let list = AxumTestRequest::get("/api/subscriptions")
        .header("authorization", &bearer(&user_token))
        .send(router)
        .await;
    assert_eq!(list.json_value()["count"], 0);
}

// ============================================================================
// Subscription Listing Tests
// ============================================================================

#[tokio::test]
async fn test_list_subscriptions_populated() {
    let resources = create_test_resources().await.unwrap();
    let (_trainer, trainer_token) = create_test_trainer(&resources).await.unwrap();
    let (_user, user_token) = create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    let first = create_plan(&router, &trainer_token, "Plan A", 10.0).await;
    let second = create_plan(&router, &trainer_token, "Plan B", 20.0).await;

    for plan_id in [&first, &second] {
        let response = AxumTestRequest::post(&format!("/api/subscriptions/{plan_id}"))
            .header("authorization", &bearer(&user_token))
            .send(router.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let response = AxumTestRequest::get("/api/subscriptions")
        .header("authorization", &bearer(&user_token))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json_value();
    assert_eq!(body["count"], 2);
    // Subscribe order, fully populated plans with trainer identity
    assert_eq!(body["subscriptions"][0]["plan"]["title"], "Plan A");
    assert_eq!(body["subscriptions"][1]["plan"]["title"], "Plan B");
    assert_eq!(
        body["subscriptions"][0]["plan"]["trainer"]["email"],
        "trainer@example.com"
    );
    assert!(body["subscriptions"][0]["subscribedAt"].is_string());
    // The charge receipt is not replayed on listings
    assert!(body["subscriptions"][0].get("payment").is_none());
}

// ============================================================================
// Unsubscribe Tests
// ============================================================================

#[tokio::test]
async fn test_unsubscribe_then_rejected_when_absent() {
    let resources = create_test_resources().await.unwrap();
    let (_trainer, trainer_token) = create_test_trainer(&resources).await.unwrap();
    let (_user, user_token) = create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    let plan_id = create_plan(&router, &trainer_token, "Temporary", 15.0).await;

    let subscribe = AxumTestRequest::post(&format!("/api/subscriptions/{plan_id}"))
        .header("authorization", &bearer(&user_token))
        .send(router.clone())
        .await;
    assert_eq!(subscribe.status_code(), StatusCode::CREATED);

    let unsubscribe = AxumTestRequest::delete(&format!("/api/subscriptions/{plan_id}"))
        .header("authorization", &bearer(&user_token))
        .send(router.clone())
        .await;
    assert_eq!(unsubscribe.status_code(), StatusCode::OK);
    assert_eq!(
        unsubscribe.json_value()["message"],
        "Successfully unsubscribed from plan"
    );

    // Unsubscribing an unsubscribed plan is rejected
    let again = AxumTestRequest::delete(&format!("/api/subscriptions/{plan_id}"))
        .header("authorization", &bearer(&user_token))
        .send(router)
        .await;
    assert_eq!(again.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        again.json_value()["error"],
        "You are not subscribed to this plan"
    );
}

#[tokio::test]
async fn test_subscription_unlocks_full_detail() {
    let resources = create_test_resources().await.unwrap();
    let (_trainer, trainer_token) = create_test_trainer(&resources).await.unwrap();
    let (_user, user_token) = create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    let plan_id = create_plan(&router, &trainer_token, "Locked", 40.0).await;

    // Preview before, full after
    let before = AxumTestRequest::get(&format!("/api/plans/{plan_id}"))
        .header("authorization", &bearer(&user_token))
        .send(router.clone())
        .await;
    assert_eq!(before.status_code(), StatusCode::FORBIDDEN);

    let subscribe = AxumTestRequest::post(&format!("/api/subscriptions/{plan_id}"))
        .header("authorization", &bearer(&user_token))
        .send(router.clone())
        .await;
    assert_eq!(subscribe.status_code(), StatusCode::CREATED);

    let after = AxumTestRequest::get(&format!("/api/plans/{plan_id}"))
        .header("authorization", &bearer(&user_token))
        .send(router)
        .await;
    assert_eq!(after.status_code(), StatusCode::OK);
    assert_eq!(after.json_value()["plan"]["hasAccess"], true);
}

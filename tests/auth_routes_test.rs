// ABOUTME: Integration tests for the authentication route handlers
// ABOUTME: Tests signup validation, login credentials, and the bearer token failure modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use common::{bearer, create_test_resources, create_test_user, TEST_JWT_SECRET};
use helpers::axum_test::AxumTestRequest;

use axum::http::StatusCode;
use fitplanhub::auth::AuthManager;
use fitplanhub::models::{User, UserRole};
use fitplanhub::routes::app_router;
use serde_json::json;

// ============================================================================
// Signup Tests
// ============================================================================

#[tokio::test]
async fn test_signup_success() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post("/api/auth/signup")
        .json(&json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "secret123"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body = response.json_value();
    assert_eq!(body["message"], "User registered successfully");
    assert!(body["token"].as_str().unwrap().len() > 20);
    assert_eq!(body["user"]["name"], "Alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["role"], "user");
}

#[tokio::test]
async fn test_signup_trainer_role() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post("/api/auth/signup")
        .json(&json!({
            "name": "Coach Bob",
            "email": "bob@example.com",
            "password": "secret123",
            "role": "trainer"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json_value()["user"]["role"], "trainer");
}

#[tokio::test]
async fn test_signup_missing_fields() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post("/api/auth/signup")
        .json(&json!({ "email": "alice@example.com" }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json_value()["error"],
        "Please provide name, email, and password"
    );
}

#[tokio::test]
async fn test_signup_invalid_role() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post("/api/auth/signup")
        .json(&json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "secret123",
            "role": "admin"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json_value()["error"],
        "Invalid role. Must be \"user\" or \"trainer\""
    );
}

#[tokio::test]
async fn test_signup_short_password() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post("/api/auth/signup")
        .json(&json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "short"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json_value()["error"],
        "Password must be at least 6 characters"
    );
}

#[tokio::test]
async fn test_signup_duplicate_email_case_insensitive() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let first = AxumTestRequest::post("/api/auth/signup")
        .json(&json!({
            "name": "Alice",
            "email": "Alice@Example.com",
            "password": "secret123"
        }))
        .send(router.clone())
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);
    // Stored lowercased
    assert_eq!(first.json_value()["user"]["email"], "alice@example.com");

    let second = AxumTestRequest::post("/api/auth/signup")
        .json(&json!({
            "name": "Alice Again",
            "email": "alice@example.com",
            "password": "secret123"
        }))
        .send(router)
        .await;

    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        second.json_value()["error"],
        "User with this email already exists"
    );
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let resources = create_test_resources().await.unwrap();
    let (user, _token) = create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({
            "email": "user@example.com",
            "password": "password123"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json_value();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], user.id.to_string());
    assert!(body["token"].as_str().unwrap().len() > 20);
}

#[tokio::test]
async fn test_login_email_case_insensitive() {
    let resources = create_test_resources().await.unwrap();
    create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({
            "email": "User@Example.COM",
            "password": "password123"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let resources = create_test_resources().await.unwrap();
    create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({
            "email": "user@example.com",
            "password": "wrong-password"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json_value()["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_unknown_email_same_message() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "password123"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json_value()["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({ "email": "user@example.com" }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json_value()["error"],
        "Please provide email and password"
    );
}

// ============================================================================
// Bearer Token Failure Modes
// ============================================================================

#[tokio::test]
async fn test_missing_token() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::get("/api/plans").send(router).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json_value()["error"],
        "Access denied. No token provided."
    );
}

#[tokio::test]
async fn test_invalid_token() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::get("/api/plans")
        .header("authorization", "Bearer not-a-real-token")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json_value()["error"], "Invalid token.");
}

#[tokio::test]
async fn test_expired_token_distinct_message() {
    let resources = create_test_resources().await.unwrap();
    let (user, _token) = create_test_user(&resources).await.unwrap();
    let router = app_router(resources);

    // Same secret, lifetime far enough in the past to clear validation leeway
    let expired_manager = AuthManager::new(TEST_JWT_SECRET, -2);
    let expired_token = expired_manager.generate_token(&user).unwrap();

    let response = AxumTestRequest::get("/api/plans")
        .header("authorization", &bearer(&expired_token))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json_value()["error"], "Token expired.");
}

#[tokio::test]
async fn test_token_for_missing_account() {
    let resources = create_test_resources().await.unwrap();
    let auth_manager = resources.auth_manager.clone();
    let router = app_router(resources);

    // Valid token whose subject was never stored
    let ghost = User::new(
        "Ghost".to_owned(),
        "ghost@example.com".to_owned(),
        "unused-hash".to_owned(),
        UserRole::User,
    );
    let token = auth_manager.generate_token(&ghost).unwrap();

    let response = AxumTestRequest::get("/api/plans")
        .header("authorization", &bearer(&token))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json_value()["error"],
        "Invalid token. User not found."
    );
}

// ============================================================================
// Root and Fallback Routes
// ============================================================================

#[tokio::test]
async fn test_root_route() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::get("/").send(router).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json_value();
    assert_eq!(body["message"], "Welcome to FitPlanHub API");
    assert_eq!(body["endpoints"]["plans"], "/api/plans");
}

#[tokio::test]
async fn test_unknown_route() {
    let resources = create_test_resources().await.unwrap();
    let router = app_router(resources);

    let response = AxumTestRequest::get("/api/nope").send(router).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json_value()["error"], "Route not found");
}

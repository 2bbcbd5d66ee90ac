// ABOUTME: Route handlers for plan subscriptions
// ABOUTME: Subscribe with an injected payment charge, list unlocked plans, unsubscribe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::plans::PlanResponse;
use super::{authenticate_account, MessageResponse, ServerResources};
use crate::entitlements;
use crate::errors::AppError;
use crate::payments::PaymentReceipt;

/// One subscription as returned by the subscribe and list endpoints
#[derive(Debug, Serialize)]
pub struct SubscriptionInfo {
    /// The unlocked plan, fully populated
    pub plan: PlanResponse,
    /// Charge receipt; present only on the subscribe response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentReceipt>,
    /// When the unlock happened
    #[serde(rename = "subscribedAt")]
    pub subscribed_at: String,
}

/// Response for POST /api/subscriptions/:planId
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    /// Human-readable outcome
    pub message: String,
    /// The new subscription with its charge receipt
    pub subscription: SubscriptionInfo,
}

/// Response for GET /api/subscriptions
#[derive(Debug, Serialize)]
pub struct ListSubscriptionsResponse {
    /// Number of subscriptions
    pub count: usize,
    /// Subscriptions in subscribe order
    pub subscriptions: Vec<SubscriptionInfo>,
}

/// Subscription routes handler
pub struct SubscriptionRoutes;

impl SubscriptionRoutes {
    /// Create all subscription routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/subscriptions/:plan_id", post(Self::handle_subscribe))
            .route("/api/subscriptions", get(Self::handle_list))
            .route(
                "/api/subscriptions/:plan_id",
                delete(Self::handle_unsubscribe),
            )
            .with_state(resources)
    }

    /// Handle POST /api/subscriptions/:planId - unlock a plan
    ///
    /// The subscription row is recorded only after the payment capability
    /// returns a receipt; the default processor never declines.
    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(plan_id): Path<String>,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;
        let plan_id =
            Uuid::parse_str(&plan_id).map_err(|_| AppError::not_found("Plan not found"))?;

        let item = resources
            .database
            .get_plan_with_trainer(plan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Plan not found"))?;

        entitlements::ensure_may_subscribe(&account, plan_id)?;

        let receipt = resources
            .payments
            .charge(account.user.id, &item.plan)
            .await
            .map_err(|_| AppError::invalid_input("Payment failed"))?;

        let subscription = resources
            .database
            .add_subscription(account.user.id, plan_id)
            .await?;
        info!(user_id = %account.user.id, plan_id = %plan_id, "subscribed to plan");

        let response = SubscribeResponse {
            message: "Successfully subscribed to plan".to_owned(),
            subscription: SubscriptionInfo {
                plan: PlanResponse::from(&item),
                payment: Some(receipt),
                subscribed_at: subscription.subscribed_at.to_rfc3339(),
            },
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/subscriptions - list the account's unlocked plans
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;

        let subscribed = resources
            .database
            .list_subscribed_plans(account.user.id)
            .await?;

        let subscriptions: Vec<SubscriptionInfo> = subscribed
            .iter()
            .map(|(item, subscribed_at)| SubscriptionInfo {
                plan: PlanResponse::from(item),
                payment: None,
                subscribed_at: subscribed_at.to_rfc3339(),
            })
            .collect();

        let response = ListSubscriptionsResponse {
            count: subscriptions.len(),
            subscriptions,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/subscriptions/:planId - drop an unlock
    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(plan_id): Path<String>,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;
        // A malformed id cannot name a held subscription
        let plan_id = Uuid::parse_str(&plan_id)
            .map_err(|_| AppError::invalid_input(entitlements::NOT_SUBSCRIBED))?;

        entitlements::ensure_may_unsubscribe(&account, plan_id)?;

        resources
            .database
            .remove_subscription(account.user.id, plan_id)
            .await?;
        info!(user_id = %account.user.id, plan_id = %plan_id, "unsubscribed from plan");

        let response = MessageResponse {
            message: "Successfully unsubscribed from plan".to_owned(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

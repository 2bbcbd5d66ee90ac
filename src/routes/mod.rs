// ABOUTME: Route module organization for FitPlanHub HTTP endpoints
// ABOUTME: Provides centralized route definitions organized by domain with shared server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

//! Route module for FitPlanHub
//!
//! This module organizes all HTTP routes by domain. Each domain module
//! contains route definitions and thin handler functions: token verification,
//! an entitlement decision from [`crate::entitlements`], a store call, and a
//! shaped JSON response.

/// Authentication routes: signup and login
pub mod auth;

/// Plan routes: CRUD plus tier-shaped reads
pub mod plans;

/// Social routes: follow edges, personalized feed, trainer discovery
pub mod social;

/// Subscription routes: subscribe, list, unsubscribe
pub mod subscriptions;

pub use auth::AuthRoutes;
pub use plans::PlanRoutes;
pub use social::SocialRoutes;
pub use subscriptions::SubscriptionRoutes;

use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use serde::{Deserialize, Serialize};

use crate::auth::{extract_bearer_token, AuthManager};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Account;
use crate::payments::PaymentProcessor;

/// Plain `{message}` response body shared by several endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Shared resources injected into every route handler
///
/// Constructed once at startup from explicit configuration; handlers receive
/// an `Arc` through axum state. No process globals.
pub struct ServerResources {
    /// Store connection
    pub database: Database,
    /// Token service
    pub auth_manager: AuthManager,
    /// Payment capability consulted by the subscribe flow
    pub payments: Arc<dyn PaymentProcessor>,
}

impl ServerResources {
    /// Bundle the server's dependencies
    #[must_use]
    pub fn new(
        database: Database,
        auth_manager: AuthManager,
        payments: Arc<dyn PaymentProcessor>,
    ) -> Self {
        Self {
            database,
            auth_manager,
            payments,
        }
    }
}

/// Resolve the requesting account from the `Authorization` header
///
/// Verifies the bearer token, loads the identity record it names, and loads
/// the account's follow and subscription edges. Every authenticated handler
/// starts here.
///
/// # Errors
///
/// Returns the contract's distinct 401s: missing header, invalid token,
/// expired token, or a token whose account no longer exists.
pub async fn authenticate_account(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> AppResult<Account> {
    let token = extract_bearer_token(headers)?;
    let user_id = resources.auth_manager.verify_token(token)?;

    let user = resources
        .database
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::auth_invalid("Invalid token. User not found."))?;

    resources.database.load_account(user).await
}

/// Build the full application router
#[must_use]
pub fn app_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(PlanRoutes::routes(resources.clone()))
        .merge(SubscriptionRoutes::routes(resources.clone()))
        .merge(SocialRoutes::routes(resources))
        .fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Handle GET / - welcome body with the endpoint map
async fn handle_root() -> Response {
    Json(json!({
        "message": "Welcome to FitPlanHub API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth",
            "plans": "/api/plans",
            "subscriptions": "/api/subscriptions",
            "social": "/api/follow, /api/following, /api/feed, /api/trainers"
        }
    }))
    .into_response()
}

/// Catch-all for undefined routes
async fn handle_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
        .into_response()
}

// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and user creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(dead_code)]

//! Shared test utilities for `fitplanhub`
//!
//! Common setup functions to reduce duplication across integration tests.

use std::sync::{Arc, Once};

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use fitplanhub::auth::AuthManager;
use fitplanhub::database::Database;
use fitplanhub::models::{User, UserRole};
use fitplanhub::payments::{
    PaymentDeclined, PaymentProcessor, PaymentReceipt, SimulatedPaymentProcessor,
};
use fitplanhub::routes::ServerResources;

static INIT_LOGGER: Once = Once::new();

/// Shared signing secret for all test tokens
pub const TEST_JWT_SECRET: &str = "test-signing-secret";

/// Low bcrypt cost keeps test account creation fast; verification is
/// cost-agnostic so login flows still exercise the real path
const TEST_BCRYPT_COST: u32 = 4;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .try_init();
    });
}

/// Standard test resources: in-memory database, test token service,
/// always-succeeding payments
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    create_test_resources_with_payments(Arc::new(SimulatedPaymentProcessor)).await
}

/// Test resources with an injected payment processor
pub async fn create_test_resources_with_payments(
    payments: Arc<dyn PaymentProcessor>,
) -> Result<Arc<ServerResources>> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    let auth_manager = AuthManager::new(TEST_JWT_SECRET, 7);
    Ok(Arc::new(ServerResources::new(
        database,
        auth_manager,
        payments,
    )))
}

/// A payment processor that declines every charge
pub struct DecliningPaymentProcessor;

#[async_trait]
impl PaymentProcessor for DecliningPaymentProcessor {
    async fn charge(
        &self,
        _account_id: Uuid,
        _plan: &fitplanhub::models::Plan,
    ) -> std::result::Result<PaymentReceipt, PaymentDeclined> {
        Err(PaymentDeclined)
    }
}

/// Create an account directly in the store and issue it a token
pub async fn create_test_account(
    resources: &Arc<ServerResources>,
    name: &str,
    email: &str,
    role: UserRole,
) -> Result<(User, String)> {
    let password_hash = bcrypt::hash("password123", TEST_BCRYPT_COST)?;
    let user = User::new(
        name.to_owned(),
        email.to_lowercase(),
        password_hash,
        role,
    );
    resources.database.create_user(&user).await?;
    let token = resources.auth_manager.generate_token(&user)?;
    Ok((user, token))
}

/// Convenience: a regular user account
pub async fn create_test_user(resources: &Arc<ServerResources>) -> Result<(User, String)> {
    create_test_account(resources, "Test User", "user@example.com", UserRole::User).await
}

/// Convenience: a trainer account
pub async fn create_test_trainer(resources: &Arc<ServerResources>) -> Result<(User, String)> {
    create_test_account(
        resources,
        "Test Trainer",
        "trainer@example.com",
        UserRole::Trainer,
    )
    .await
}

/// Bearer header value for a token
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

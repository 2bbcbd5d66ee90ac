// ABOUTME: Authentication route handlers for account registration and login
// ABOUTME: Field validation, duplicate email rejection, bcrypt hashing, and token issuance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ServerResources;
use crate::errors::AppError;
use crate::models::{User, UserRole};

/// Request body for POST /api/auth/signup
///
/// Fields are optional so absence maps onto the documented 400 rather than a
/// deserialization failure.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// Display name
    pub name: Option<String>,
    /// Email address, unique case-insensitively
    pub email: Option<String>,
    /// Plaintext password, hashed before storage
    pub password: Option<String>,
    /// Requested role; defaults to regular user
    pub role: Option<String>,
}

/// Request body for POST /api/auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: Option<String>,
    /// Plaintext password
    pub password: Option<String>,
}

/// Sanitized account fields echoed back by both auth endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    /// Account id
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Account role
    pub role: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_owned(),
        }
    }
}

/// Response for signup and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Human-readable outcome
    pub message: String,
    /// Bearer token for subsequent requests
    pub token: String,
    /// The authenticated account
    pub user: UserInfo,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/signup", post(Self::handle_signup))
            .route("/api/auth/login", post(Self::handle_login))
            .with_state(resources)
    }

    /// Minimal structural email check; anything fancier belongs to a mail
    /// verification flow this system does not have
    fn is_valid_email(email: &str) -> bool {
        let mut parts = email.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
            }
            _ => false,
        }
    }

    /// Handle POST /api/auth/signup - register a new user or trainer
    async fn handle_signup(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SignupRequest>,
    ) -> Result<Response, AppError> {
        let (name, email, password) = match (
            request.name.as_deref().map(str::trim),
            request.email.as_deref().map(str::trim),
            request.password.as_deref(),
        ) {
            (Some(name), Some(email), Some(password))
                if !name.is_empty() && !email.is_empty() && !password.is_empty() =>
            {
                (name, email.to_lowercase(), password)
            }
            _ => {
                return Err(AppError::invalid_input(
                    "Please provide name, email, and password",
                ))
            }
        };

        if !Self::is_valid_email(&email) {
            return Err(AppError::invalid_input("Please provide a valid email"));
        }

        if password.len() < 6 {
            return Err(AppError::invalid_input(
                "Password must be at least 6 characters",
            ));
        }

        let role = match request.role.as_deref() {
            None => UserRole::User,
            Some(raw) => UserRole::parse_strict(raw).ok_or_else(|| {
                AppError::invalid_input("Invalid role. Must be \"user\" or \"trainer\"")
            })?,
        };

        if resources.database.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::invalid_input(
                "User with this email already exists",
            ));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let user = User::new(name.to_owned(), email, password_hash, role);
        resources.database.create_user(&user).await?;

        let token = resources.auth_manager.generate_token(&user)?;
        info!(user_id = %user.id, role = user.role.as_str(), "account registered");

        let response = AuthResponse {
            message: "User registered successfully".to_owned(),
            token,
            user: UserInfo::from(&user),
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /api/auth/login - authenticate an existing account
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let (email, password) = match (request.email.as_deref(), request.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                (email, password)
            }
            _ => {
                return Err(AppError::invalid_input(
                    "Please provide email and password",
                ))
            }
        };

        // Same message for unknown email and wrong password
        let user = resources
            .database
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        let matches = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
        if !matches {
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        let token = resources.auth_manager.generate_token(&user)?;
        info!(user_id = %user.id, "login successful");

        let response = AuthResponse {
            message: "Login successful".to_owned(),
            token,
            user: UserInfo::from(&user),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

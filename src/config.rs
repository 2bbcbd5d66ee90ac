// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Explicit configuration passed into constructors, no ambient singletons
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use std::env;

use crate::errors::{AppError, AppResult};

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default database location when `DATABASE_URL` is unset
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/fitplanhub.db";

/// Default bearer token lifetime in days
const DEFAULT_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Server configuration, environment-only
///
/// The signing secret and store location are injected into the token service
/// and store constructors from here; nothing reads the environment after
/// startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP server binds to
    pub http_port: u16,
    /// Database connection URL
    pub database_url: String,
    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,
    /// Bearer token lifetime in days
    pub token_expiry_days: i64,
}

impl ServerConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is unset or empty
    /// - `HTTP_PORT` is set but not a valid port number
    /// - `TOKEN_EXPIRY_DAYS` is set but not a positive integer
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("Invalid HTTP_PORT '{raw}': {e}")))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::config("JWT_SECRET must be set to a non-empty signing secret"))?;
        if jwt_secret.is_empty() {
            return Err(AppError::config(
                "JWT_SECRET must be set to a non-empty signing secret",
            ));
        }

        let token_expiry_days = match env::var("TOKEN_EXPIRY_DAYS") {
            Ok(raw) => {
                let days = raw.parse::<i64>().map_err(|e| {
                    AppError::config(format!("Invalid TOKEN_EXPIRY_DAYS '{raw}': {e}"))
                })?;
                if days <= 0 {
                    return Err(AppError::config("TOKEN_EXPIRY_DAYS must be positive"));
                }
                days
            }
            Err(_) => DEFAULT_TOKEN_EXPIRY_DAYS,
        };

        Ok(Self {
            http_port,
            database_url,
            jwt_secret,
            token_expiry_days,
        })
    }
}

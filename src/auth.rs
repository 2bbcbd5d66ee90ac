// ABOUTME: Token service issuing and verifying signed bearer tokens
// ABOUTME: HS256 JWTs carrying the account id, with distinct expired vs invalid failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::User;

/// JWT claims carried by every bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id the token was issued for
    pub sub: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Token service: issues and verifies signed bearer tokens
///
/// Consumers downstream of verification see only the resolved account id;
/// token internals stay in this module.
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_days: i64,
}

impl AuthManager {
    /// Create a token service from a signing secret and token lifetime
    #[must_use]
    pub fn new(secret: &str, expiry_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_days,
        }
    }

    /// Issue a token for an account
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.expiry_days)).timestamp(),
        };

        encode(&jsonwebtoken::Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a token and resolve the account id it was issued for
    ///
    /// # Errors
    ///
    /// Returns `AuthExpired` for expired tokens and `AuthInvalid` for every
    /// other verification failure, with the distinct messages the API
    /// contract requires.
    pub fn verify_token(&self, token: &str) -> AppResult<Uuid> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::auth_expired("Token expired."),
                _ => AppError::auth_invalid("Invalid token."),
            },
        )?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| AppError::auth_invalid("Invalid token."))
    }
}

/// Extract the bearer token from an `Authorization` header
///
/// # Errors
///
/// Returns `AuthRequired` when the header is absent and `AuthInvalid` when it
/// is present but not a bearer credential.
pub fn extract_bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::auth_required("Access denied. No token provided."))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth_invalid("Invalid token."))
}

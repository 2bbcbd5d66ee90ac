// ABOUTME: Unified error handling system with standard error codes and HTTP responses
// ABOUTME: Maps authentication, authorization, validation, and store failures onto the wire taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Machine-readable error codes, one per failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No credentials were presented
    AuthRequired,
    /// Credentials were presented but could not be verified
    AuthInvalid,
    /// Credentials were valid once but have expired
    AuthExpired,
    /// Authenticated account lacks the right to perform the operation
    PermissionDenied,
    /// Target entity does not exist
    ResourceNotFound,
    /// Request payload or requested state transition is invalid
    InvalidInput,
    /// Underlying store operation failed
    DatabaseError,
    /// Configuration is missing or malformed
    ConfigError,
    /// Catch-all for unexpected internal failures
    InternalError,
}

impl ErrorCode {
    /// HTTP status this code maps to
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::DatabaseError | Self::ConfigError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Application error carrying an [`ErrorCode`] and a user-facing message
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Failure classification
    pub code: ErrorCode,
    /// User-facing message, returned verbatim in the response body
    pub message: String,
    /// Optional extra detail, surfaced only on 500s
    pub details: Option<String>,
}

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach detail text to an existing error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Missing credentials (401)
    pub fn auth_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthRequired, message)
    }

    /// Unverifiable credentials (401)
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Expired credentials (401)
    pub fn auth_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthExpired, message)
    }

    /// Insufficient rights (403)
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Missing entity (404)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// Invalid payload or state transition (400)
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Store failure (500)
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration failure (500)
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Unexpected internal failure (500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {err}"))
    }
}

/// Wire shape for error responses: `{error, details?}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        // Details ride along only on unexpected failures; validation and
        // authorization messages already say everything the client may know.
        let details = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = ?self.code, message = %self.message, "request failed");
            self.details
        } else {
            None
        };
        let body = ErrorBody {
            error: self.message,
            details,
        };
        (status, Json(body)).into_response()
    }
}

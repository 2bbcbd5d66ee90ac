// ABOUTME: Main library entry point for the FitPlanHub marketplace API
// ABOUTME: Connects fitness trainers publishing paid plans with subscribing users
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

#![deny(unsafe_code)]

//! # FitPlanHub
//!
//! A two-sided marketplace REST API connecting fitness trainers (who publish
//! paid plans) with regular users (who subscribe to plans and follow
//! trainers).
//!
//! ## Features
//!
//! - **Accounts**: registration and login for users and trainers with JWT
//!   bearer tokens
//! - **Plans**: trainer-owned plan CRUD with entitlement-shaped read views
//! - **Subscriptions**: simulated-payment plan unlocks with full-detail access
//! - **Social**: follow trainers, personalized plan feed, trainer discovery
//!
//! ## Architecture
//!
//! Every request flows token verification -> account load -> entitlement
//! decision -> store read/write -> shaped JSON response. The entitlement
//! rules live in [`entitlements`] and are independent of the HTTP layer.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fitplanhub::config::ServerConfig;
//! use fitplanhub::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("FitPlanHub configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Configuration management from environment variables
pub mod config;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Common data models for accounts, plans, and subscriptions
pub mod models;

/// Token issuance, verification, and bearer extraction
pub mod auth;

/// Access-control core: visibility tiers and mutation policy
pub mod entitlements;

/// Payment capability seam with a simulated default processor
pub mod payments;

/// Database management over `SQLite`
pub mod database;

/// `HTTP` routes for accounts, plans, subscriptions, and social features
pub mod routes;

/// Production logging and structured output
pub mod logging;

// ABOUTME: FitPlanHub server binary
// ABOUTME: Loads environment configuration, wires resources, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

//! # FitPlanHub Server
//!
//! Starts the marketplace REST API.
//!
//! ## Usage
//!
//! ```bash
//! # Start with environment configuration
//! JWT_SECRET=change-me cargo run --bin fitplanhub-server
//!
//! # Override the port and database location
//! JWT_SECRET=change-me cargo run --bin fitplanhub-server -- \
//!     --port 8080 --database-url sqlite:./data/dev.db
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use fitplanhub::auth::AuthManager;
use fitplanhub::config::ServerConfig;
use fitplanhub::database::Database;
use fitplanhub::logging::init_tracing;
use fitplanhub::payments::SimulatedPaymentProcessor;
use fitplanhub::routes::{app_router, ServerResources};

#[derive(Parser)]
#[command(
    name = "fitplanhub-server",
    about = "FitPlanHub marketplace API server",
    version
)]
struct ServerArgs {
    /// HTTP port override
    #[arg(long)]
    port: Option<u16>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = ServerArgs::parse();
    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    let database = Database::new(&config.database_url)
        .await
        .context("Failed to open database")?;
    info!(database_url = %config.database_url, "database ready");

    let auth_manager = AuthManager::new(&config.jwt_secret, config.token_expiry_days);
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(SimulatedPaymentProcessor),
    ));

    let app = app_router(resources);
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "FitPlanHub API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

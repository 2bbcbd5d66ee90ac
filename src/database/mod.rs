// ABOUTME: Core database management with migration system for SQLite
// ABOUTME: Handles schema setup for accounts, plans, subscriptions, and follow edges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

/// Plan storage: CRUD, trainer joins, feed queries, cascade cleanup
pub mod plans;
/// Account storage: identity records, follow edges, subscription rows
pub mod users;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Database connection pool
///
/// All store operations hang off this type; handlers receive it through the
/// shared server resources rather than any process-global connection.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - `SQLite` file creation fails
    /// - Migration process fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        // An in-memory SQLite database exists only on the connection that
        // created it; pin the pool to one long-lived connection for those.
        let pool = if connection_options.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .connect(&connection_options)
                .await
        } else {
            SqlitePool::connect(&connection_options).await
        }
        .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate_impl().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run all database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_impl().await
    }

    async fn migrate_impl(&self) -> AppResult<()> {
        info!("Running database migrations...");

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create users table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS plans (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                duration INTEGER NOT NULL,
                trainer_id TEXT NOT NULL REFERENCES users(id),
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create plans table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_plans_trainer ON plans(trainer_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create plans index: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_plans_created_at ON plans(created_at)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create plans index: {e}")))?;

        // Composite primary key doubles as the store-level uniqueness
        // constraint on (account, plan) subscriptions.
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS subscriptions (
                user_id TEXT NOT NULL REFERENCES users(id),
                plan_id TEXT NOT NULL REFERENCES plans(id),
                subscribed_at TEXT NOT NULL,
                PRIMARY KEY (user_id, plan_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create subscriptions table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS followed_trainers (
                user_id TEXT NOT NULL REFERENCES users(id),
                trainer_id TEXT NOT NULL REFERENCES users(id),
                followed_at TEXT NOT NULL,
                PRIMARY KEY (user_id, trainer_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to create followed_trainers table: {e}"))
        })?;

        Ok(())
    }
}

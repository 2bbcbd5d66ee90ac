// ABOUTME: Account management database operations
// ABOUTME: Handles identity records, follow edges, and subscription rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Account, Subscription, User, UserRole};

impl Database {
    /// Create a new account record
    ///
    /// The route layer checks email uniqueness first to produce the
    /// documented 400; the unique index backstops races.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including on a duplicate email
    pub async fn create_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, name, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        Ok(())
    }

    /// Get an account by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let user_id_str = user_id.to_string();
        self.get_user_by_field("id", &user_id_str).await
    }

    /// Get an account by email, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let normalized = email.trim().to_lowercase();
        self.get_user_by_field("email", &normalized).await
    }

    /// Internal implementation for getting an account
    async fn get_user_by_field(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        let query = format!(
            r"
            SELECT id, name, email, password_hash, role, created_at
            FROM users WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by {field}: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// List all trainer accounts, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_trainers(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, email, password_hash, role, created_at
            FROM users WHERE role = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(UserRole::Trainer.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list trainers: {e}")))?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Convert a database row to a `User` struct
    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let id: String = row.get("id");
        let role: String = row.get("role");

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse user id UUID: {e}")))?,
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: UserRole::parse(&role),
            created_at: row.get("created_at"),
        })
    }

    /// Load an identity record together with its follow and subscription edges
    ///
    /// # Errors
    ///
    /// Returns an error if either edge query fails
    pub async fn load_account(&self, user: User) -> AppResult<Account> {
        let following = self.get_following(user.id).await?;
        let subscriptions = self.get_subscriptions(user.id).await?;
        Ok(Account {
            user,
            following,
            subscriptions,
        })
    }

    /// Trainer ids an account follows, in follow order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_following(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows = sqlx::query(
            r"
            SELECT trainer_id FROM followed_trainers
            WHERE user_id = $1
            ORDER BY followed_at ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get following: {e}")))?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("trainer_id");
                Uuid::parse_str(&id).map_err(|e| {
                    AppError::internal(format!("Failed to parse trainer id UUID: {e}"))
                })
            })
            .collect()
    }

    /// Record a follow edge
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including on a duplicate edge
    pub async fn add_follow(&self, user_id: Uuid, trainer_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO followed_trainers (user_id, trainer_id, followed_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(user_id.to_string())
        .bind(trainer_id.to_string())
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to add follow: {e}")))?;

        Ok(())
    }

    /// Remove a follow edge
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn remove_follow(&self, user_id: Uuid, trainer_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r"
            DELETE FROM followed_trainers
            WHERE user_id = $1 AND trainer_id = $2
            ",
        )
        .bind(user_id.to_string())
        .bind(trainer_id.to_string())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to remove follow: {e}")))?;

        Ok(())
    }

    /// Subscriptions held by an account, in subscribe order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_subscriptions(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query(
            r"
            SELECT plan_id, subscribed_at FROM subscriptions
            WHERE user_id = $1
            ORDER BY subscribed_at ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get subscriptions: {e}")))?;

        rows.iter()
            .map(|row| {
                let plan_id: String = row.get("plan_id");
                let subscribed_at: DateTime<Utc> = row.get("subscribed_at");
                Ok(Subscription {
                    plan_id: Uuid::parse_str(&plan_id).map_err(|e| {
                        AppError::internal(format!("Failed to parse plan id UUID: {e}"))
                    })?,
                    subscribed_at,
                })
            })
            .collect()
    }

    /// Record a subscription unlock
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including when the composite
    /// primary key rejects a concurrent duplicate
    pub async fn add_subscription(&self, user_id: Uuid, plan_id: Uuid) -> AppResult<Subscription> {
        let subscribed_at = Utc::now();
        sqlx::query(
            r"
            INSERT INTO subscriptions (user_id, plan_id, subscribed_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(user_id.to_string())
        .bind(plan_id.to_string())
        .bind(subscribed_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to add subscription: {e}")))?;

        Ok(Subscription {
            plan_id,
            subscribed_at,
        })
    }

    /// Remove a subscription unlock
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn remove_subscription(&self, user_id: Uuid, plan_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r"
            DELETE FROM subscriptions
            WHERE user_id = $1 AND plan_id = $2
            ",
        )
        .bind(user_id.to_string())
        .bind(plan_id.to_string())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to remove subscription: {e}")))?;

        Ok(())
    }
}

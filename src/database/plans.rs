// ABOUTME: Plan storage database operations
// ABOUTME: Handles plan CRUD with trainer joins, feed queries, and subscription cascade cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Plan, PlanWithTrainer, TrainerRef};

/// Shared projection for plan reads with the owning trainer joined in
const PLAN_WITH_TRAINER_COLUMNS: &str = r"
    p.id, p.title, p.description, p.price, p.duration, p.trainer_id, p.created_at,
    u.name AS trainer_name, u.email AS trainer_email
";

impl Database {
    /// Create a new plan
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_plan(&self, plan: &Plan) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO plans (id, title, description, price, duration, trainer_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(plan.id.to_string())
        .bind(&plan.title)
        .bind(&plan.description)
        .bind(plan.price)
        .bind(plan.duration)
        .bind(plan.trainer_id.to_string())
        .bind(plan.created_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create plan: {e}")))?;

        Ok(())
    }

    /// Get a plan by ID, without the trainer join
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_plan(&self, plan_id: Uuid) -> AppResult<Option<Plan>> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, price, duration, trainer_id, created_at
            FROM plans WHERE id = $1
            ",
        )
        .bind(plan_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get plan: {e}")))?;

        row.map(|r| Self::row_to_plan(&r)).transpose()
    }

    /// Get a plan by ID with the owning trainer's identity joined in
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_plan_with_trainer(&self, plan_id: Uuid) -> AppResult<Option<PlanWithTrainer>> {
        let query = format!(
            r"
            SELECT {PLAN_WITH_TRAINER_COLUMNS}
            FROM plans p
            JOIN users u ON u.id = p.trainer_id
            WHERE p.id = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(plan_id.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get plan: {e}")))?;

        row.map(|r| Self::row_to_plan_with_trainer(&r)).transpose()
    }

    /// List every plan with its trainer, most recently created first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_plans(&self) -> AppResult<Vec<PlanWithTrainer>> {
        let query = format!(
            r"
            SELECT {PLAN_WITH_TRAINER_COLUMNS}
            FROM plans p
            JOIN users u ON u.id = p.trainer_id
            ORDER BY p.created_at DESC
            "
        );

        let rows = sqlx::query(&query)
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to list plans: {e}")))?;

        rows.iter().map(Self::row_to_plan_with_trainer).collect()
    }

    /// List plans owned by any of the given trainers, most recent first
    ///
    /// Backs the personalized feed: callers pass the requesting account's
    /// following set. An empty set short-circuits to an empty feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_plans_by_trainers(
        &self,
        trainer_ids: &[Uuid],
    ) -> AppResult<Vec<PlanWithTrainer>> {
        if trainer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=trainer_ids.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            r"
            SELECT {PLAN_WITH_TRAINER_COLUMNS}
            FROM plans p
            JOIN users u ON u.id = p.trainer_id
            WHERE p.trainer_id IN ({placeholders})
            ORDER BY p.created_at DESC
            "
        );

        let mut q = sqlx::query(&query);
        for id in trainer_ids {
            q = q.bind(id.to_string());
        }

        let rows = q
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to list feed plans: {e}")))?;

        rows.iter().map(Self::row_to_plan_with_trainer).collect()
    }

    /// List the plans an account has subscribed to, in subscribe order,
    /// each paired with its subscription timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_subscribed_plans(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<(PlanWithTrainer, DateTime<Utc>)>> {
        let query = format!(
            r"
            SELECT {PLAN_WITH_TRAINER_COLUMNS}, s.subscribed_at
            FROM subscriptions s
            JOIN plans p ON p.id = s.plan_id
            JOIN users u ON u.id = p.trainer_id
            WHERE s.user_id = $1
            ORDER BY s.subscribed_at ASC
            "
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to list subscribed plans: {e}")))?;

        rows.iter()
            .map(|row| {
                let plan = Self::row_to_plan_with_trainer(row)?;
                let subscribed_at: DateTime<Utc> = row.get("subscribed_at");
                Ok((plan, subscribed_at))
            })
            .collect()
    }

    /// Update a plan's mutable fields
    ///
    /// The owning trainer reference is deliberately not part of the update:
    /// it never changes after creation.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is not found or the update fails
    pub async fn update_plan(&self, plan: &Plan) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE plans SET
                title = $2,
                description = $3,
                price = $4,
                duration = $5
            WHERE id = $1
            ",
        )
        .bind(plan.id.to_string())
        .bind(&plan.title)
        .bind(&plan.description)
        .bind(plan.price)
        .bind(plan.duration)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update plan: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Plan {} not found", plan.id)));
        }

        Ok(())
    }

    /// Delete a plan and pull it out of every account's subscriptions
    ///
    /// The cleanup is a best-effort second statement, not a transaction: a
    /// subscribe racing the delete can lose its row or fail its insert, and
    /// last-write-wins is the accepted behavior at this scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is not found or either statement fails
    pub async fn delete_plan(&self, plan_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(plan_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to delete plan: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Plan {plan_id} not found")));
        }

        sqlx::query("DELETE FROM subscriptions WHERE plan_id = $1")
            .bind(plan_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to clean up plan subscriptions: {e}"))
            })?;

        Ok(())
    }

    /// Convert a database row to a `Plan` struct
    fn row_to_plan(row: &SqliteRow) -> AppResult<Plan> {
        let id: String = row.get("id");
        let trainer_id: String = row.get("trainer_id");

        Ok(Plan {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse plan id UUID: {e}")))?,
            title: row.get("title"),
            description: row.get("description"),
            price: row.get("price"),
            duration: row.get("duration"),
            trainer_id: Uuid::parse_str(&trainer_id)
                .map_err(|e| AppError::internal(format!("Failed to parse trainer id UUID: {e}")))?,
            created_at: row.get("created_at"),
        })
    }

    /// Convert a joined row to a `PlanWithTrainer` struct
    fn row_to_plan_with_trainer(row: &SqliteRow) -> AppResult<PlanWithTrainer> {
        let plan = Self::row_to_plan(row)?;
        let trainer = TrainerRef {
            id: plan.trainer_id,
            name: row.get("trainer_name"),
            email: row.get("trainer_email"),
        };
        Ok(PlanWithTrainer { plan, trainer })
    }
}

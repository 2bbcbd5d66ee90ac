// ABOUTME: Route handlers for plan CRUD and tier-shaped plan reads
// ABOUTME: Applies the entitlement model to decide FULL vs PREVIEW projections per requester
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{authenticate_account, MessageResponse, ServerResources};
use crate::entitlements::{self, PlanMutation};
use crate::errors::{AppError, AppResult};
use crate::models::{Plan, PlanWithTrainer, TrainerRef};

/// Trainer identity embedded in full plan projections
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainerInfo {
    /// Trainer account id
    #[serde(rename = "_id")]
    pub id: String,
    /// Trainer display name
    pub name: String,
    /// Trainer email
    pub email: String,
}

impl From<&TrainerRef> for TrainerInfo {
    fn from(trainer: &TrainerRef) -> Self {
        Self {
            id: trainer.id.to_string(),
            name: trainer.name.clone(),
            email: trainer.email.clone(),
        }
    }
}

/// Trainer identity embedded in preview projections: id and name only
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainerPreviewInfo {
    /// Trainer account id
    #[serde(rename = "_id")]
    pub id: String,
    /// Trainer display name
    pub name: String,
}

/// Full plan projection with the trainer joined in
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Plan id
    #[serde(rename = "_id")]
    pub id: String,
    /// Plan title
    pub title: String,
    /// Full description
    pub description: String,
    /// Price
    pub price: f64,
    /// Duration in days
    pub duration: i64,
    /// Owning trainer
    pub trainer: TrainerInfo,
    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<&PlanWithTrainer> for PlanResponse {
    fn from(item: &PlanWithTrainer) -> Self {
        Self {
            id: item.plan.id.to_string(),
            title: item.plan.title.clone(),
            description: item.plan.description.clone(),
            price: item.plan.price,
            duration: item.plan.duration,
            trainer: TrainerInfo::from(&item.trainer),
            created_at: item.plan.created_at.to_rfc3339(),
        }
    }
}

/// Full plan projection plus the access marker, for entitled reads
#[derive(Debug, Serialize)]
pub struct EntitledPlan {
    /// The full plan fields
    #[serde(flatten)]
    pub plan: PlanResponse,
    /// Always true on this projection
    #[serde(rename = "hasAccess")]
    pub has_access: bool,
}

/// Reduced projection for unentitled readers: description withheld
#[derive(Debug, Serialize)]
pub struct PlanPreview {
    /// Plan id
    #[serde(rename = "_id")]
    pub id: String,
    /// Plan title
    pub title: String,
    /// Price
    pub price: f64,
    /// Duration in days
    pub duration: i64,
    /// Owning trainer, id and name only
    pub trainer: TrainerPreviewInfo,
}

impl From<&PlanWithTrainer> for PlanPreview {
    fn from(item: &PlanWithTrainer) -> Self {
        Self {
            id: item.plan.id.to_string(),
            title: item.plan.title.clone(),
            price: item.plan.price,
            duration: item.plan.duration,
            trainer: TrainerPreviewInfo {
                id: item.trainer.id.to_string(),
                name: item.trainer.name.clone(),
            },
        }
    }
}

/// Preview projection as it appears inside the plan list
#[derive(Debug, Serialize)]
pub struct PreviewListItem {
    /// The preview fields
    #[serde(flatten)]
    pub preview: PlanPreview,
    /// Always false on this projection
    #[serde(rename = "hasAccess")]
    pub has_access: bool,
    /// Upsell hint
    pub message: String,
}

/// One entry of the plan list, shaped per requester entitlement
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PlanListItem {
    /// Requester is entitled to every field
    Full(EntitledPlan),
    /// Requester sees the reduced projection
    Preview(PreviewListItem),
}

/// Response for listing plans
#[derive(Debug, Serialize)]
pub struct ListPlansResponse {
    /// Number of plans
    pub count: usize,
    /// Tier-shaped plan projections, newest first
    pub plans: Vec<PlanListItem>,
}

/// Response envelope for plan create and update
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanEnvelope {
    /// Human-readable outcome
    pub message: String,
    /// The created or updated plan
    pub plan: PlanResponse,
}

/// Request body for creating a plan
#[derive(Debug, Deserialize)]
pub struct CreatePlanBody {
    /// Plan title
    pub title: Option<String>,
    /// Full description
    pub description: Option<String>,
    /// Price, non-negative
    pub price: Option<f64>,
    /// Duration in days, at least 1
    pub duration: Option<i64>,
}

/// Request body for updating a plan; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdatePlanBody {
    /// New title (if provided)
    pub title: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// New price (if provided)
    pub price: Option<f64>,
    /// New duration (if provided)
    pub duration: Option<i64>,
}

/// Plan routes handler
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/plans", post(Self::handle_create))
            .route("/api/plans", get(Self::handle_list))
            .route("/api/plans/:id", get(Self::handle_get))
            .route("/api/plans/:id", put(Self::handle_update))
            .route("/api/plans/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Parse a plan id path segment; malformed ids read as absent plans
    fn parse_plan_id(raw: &str) -> AppResult<Uuid> {
        Uuid::parse_str(raw).map_err(|_| AppError::not_found("Plan not found"))
    }

    fn validate_price(price: f64) -> AppResult<f64> {
        if price.is_finite() && price >= 0.0 {
            Ok(price)
        } else {
            Err(AppError::invalid_input("Price cannot be negative"))
        }
    }

    fn validate_duration(duration: i64) -> AppResult<i64> {
        if duration >= 1 {
            Ok(duration)
        } else {
            Err(AppError::invalid_input("Duration must be at least 1 day"))
        }
    }

    /// Handle POST /api/plans - create a plan, trainers only
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreatePlanBody>,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;
        entitlements::ensure_may_create_plan(&account)?;

        let (title, description, price, duration) = match (
            body.title.as_deref().map(str::trim),
            body.description.as_deref(),
            body.price,
            body.duration,
        ) {
            (Some(title), Some(description), Some(price), Some(duration))
                if !title.is_empty() && !description.is_empty() =>
            {
                (title, description, price, duration)
            }
            _ => {
                return Err(AppError::invalid_input(
                    "Please provide title, description, price, and duration",
                ))
            }
        };
        let price = Self::validate_price(price)?;
        let duration = Self::validate_duration(duration)?;

        let plan = Plan {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            description: description.to_owned(),
            price,
            duration,
            trainer_id: account.user.id,
            created_at: chrono::Utc::now(),
        };
        resources.database.create_plan(&plan).await?;
        info!(plan_id = %plan.id, trainer_id = %account.user.id, "plan created");

        let with_trainer = PlanWithTrainer {
            plan,
            trainer: TrainerRef {
                id: account.user.id,
                name: account.user.name.clone(),
                email: account.user.email.clone(),
            },
        };
        let response = PlanEnvelope {
            message: "Plan created successfully".to_owned(),
            plan: PlanResponse::from(&with_trainer),
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/plans - list every plan, shaped per requester tier
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;
        let plans = resources.database.list_plans().await?;

        let shaped: Vec<PlanListItem> = plans
            .iter()
            .map(|item| {
                if entitlements::list_visibility(&account, &item.plan).is_full() {
                    PlanListItem::Full(EntitledPlan {
                        plan: PlanResponse::from(item),
                        has_access: true,
                    })
                } else {
                    PlanListItem::Preview(PreviewListItem {
                        preview: PlanPreview::from(item),
                        has_access: false,
                        message: "Subscribe to view full details".to_owned(),
                    })
                }
            })
            .collect();

        let response = ListPlansResponse {
            count: shaped.len(),
            plans: shaped,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/plans/:id - single plan read
    ///
    /// Unentitled requesters get the documented dual-purpose response: a 403
    /// whose body carries the preview projection, not a bare error.
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;
        let plan_id = Self::parse_plan_id(&id)?;

        let item = resources
            .database
            .get_plan_with_trainer(plan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Plan not found"))?;

        if entitlements::detail_visibility(&account, &item.plan).is_full() {
            let response = json!({
                "plan": EntitledPlan {
                    plan: PlanResponse::from(&item),
                    has_access: true,
                }
            });
            Ok((StatusCode::OK, Json(response)).into_response())
        } else {
            let body = json!({
                "error": "Access denied. Subscribe to view full plan details.",
                "preview": PlanPreview::from(&item),
            });
            Ok((StatusCode::FORBIDDEN, Json(body)).into_response())
        }
    }

    /// Handle PUT /api/plans/:id - partial update, owning trainer only
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<UpdatePlanBody>,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;
        let plan_id = Self::parse_plan_id(&id)?;

        let mut item = resources
            .database
            .get_plan_with_trainer(plan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Plan not found"))?;
        entitlements::ensure_owns_plan(&account, &item.plan, PlanMutation::Update)?;

        if let Some(title) = body.title.as_deref().map(str::trim) {
            if !title.is_empty() {
                item.plan.title = title.to_owned();
            }
        }
        if let Some(description) = body.description {
            if !description.is_empty() {
                item.plan.description = description;
            }
        }
        if let Some(price) = body.price {
            item.plan.price = Self::validate_price(price)?;
        }
        if let Some(duration) = body.duration {
            item.plan.duration = Self::validate_duration(duration)?;
        }

        resources.database.update_plan(&item.plan).await?;
        info!(plan_id = %item.plan.id, "plan updated");

        let response = PlanEnvelope {
            message: "Plan updated successfully".to_owned(),
            plan: PlanResponse::from(&item),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/plans/:id - delete with subscription cascade
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;
        let plan_id = Self::parse_plan_id(&id)?;

        let plan = resources
            .database
            .get_plan(plan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Plan not found"))?;
        entitlements::ensure_owns_plan(&account, &plan, PlanMutation::Delete)?;

        resources.database.delete_plan(plan_id).await?;
        info!(plan_id = %plan_id, trainer_id = %account.user.id, "plan deleted");

        let response = MessageResponse {
            message: "Plan deleted successfully".to_owned(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

// ABOUTME: Route handlers for social features: follow edges, feed, trainer discovery
// ABOUTME: Follow preconditions checked in contract order, feed annotated with purchase flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::plans::TrainerInfo;
use super::{authenticate_account, MessageResponse, ServerResources};
use crate::entitlements;
use crate::errors::AppError;
use crate::models::PlanWithTrainer;

/// A followed trainer as returned by the follow endpoints
#[derive(Debug, Serialize)]
pub struct FollowedTrainer {
    /// Trainer account id
    pub id: String,
    /// Trainer display name
    pub name: String,
    /// Trainer email
    pub email: String,
    /// Account role, always `trainer` for live edges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Response for POST /api/follow/:trainerId
#[derive(Debug, Serialize)]
pub struct FollowResponse {
    /// Human-readable outcome
    pub message: String,
    /// The trainer that was followed
    pub trainer: FollowedTrainer,
}

/// Response for GET /api/follow
#[derive(Debug, Serialize)]
pub struct FollowingResponse {
    /// Number of followed trainers
    pub count: usize,
    /// Followed trainers in follow order
    pub trainers: Vec<FollowedTrainer>,
}

/// One plan in the personalized feed
#[derive(Debug, Serialize)]
pub struct FeedItem {
    /// Plan id
    #[serde(rename = "_id")]
    pub id: String,
    /// Plan title
    pub title: String,
    /// Full description; feed entries come from followed trainers
    pub description: String,
    /// Price
    pub price: f64,
    /// Duration in days
    pub duration: i64,
    /// Owning trainer
    pub trainer: TrainerInfo,
    /// Whether the requesting account already holds this plan
    #[serde(rename = "isPurchased")]
    pub is_purchased: bool,
    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Response for GET /api/feed
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    /// Number of feed entries
    pub count: usize,
    /// Plans from followed trainers, newest first
    pub feed: Vec<FeedItem>,
}

/// One trainer in the discovery listing
#[derive(Debug, Serialize)]
pub struct TrainerListing {
    /// Trainer account id
    pub id: String,
    /// Trainer display name
    pub name: String,
    /// Trainer email
    pub email: String,
    /// Whether the requesting account follows this trainer
    #[serde(rename = "isFollowing")]
    pub is_following: bool,
    /// Account creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Response for GET /api/trainers
#[derive(Debug, Serialize)]
pub struct TrainersResponse {
    /// Number of trainers
    pub count: usize,
    /// All trainer accounts, newest first
    pub trainers: Vec<TrainerListing>,
}

/// Social routes handler
pub struct SocialRoutes;

impl SocialRoutes {
    /// Create all social routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/follow/:trainer_id", post(Self::handle_follow))
            .route("/api/follow/:trainer_id", delete(Self::handle_unfollow))
            .route("/api/follow", get(Self::handle_following))
            .route("/api/following", get(Self::handle_following))
            .route("/api/feed", get(Self::handle_feed))
            .route("/api/trainers", get(Self::handle_trainers))
            .with_state(resources)
    }

    /// Handle POST /api/follow/:trainerId - follow a trainer
    async fn handle_follow(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(trainer_id): Path<String>,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;
        // A malformed id cannot name an existing trainer
        let trainer_id = Uuid::parse_str(&trainer_id)
            .map_err(|_| AppError::not_found(entitlements::TRAINER_NOT_FOUND))?;

        let target = resources.database.get_user(trainer_id).await?;
        let trainer = entitlements::ensure_may_follow(&account, target.as_ref())?;

        resources
            .database
            .add_follow(account.user.id, trainer.id)
            .await?;
        info!(user_id = %account.user.id, trainer_id = %trainer.id, "followed trainer");

        let response = FollowResponse {
            message: "Successfully followed trainer".to_owned(),
            trainer: FollowedTrainer {
                id: trainer.id.to_string(),
                name: trainer.name.clone(),
                email: trainer.email.clone(),
                role: None,
            },
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/follow/:trainerId - drop a follow edge
    async fn handle_unfollow(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(trainer_id): Path<String>,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;
        let trainer_id = Uuid::parse_str(&trainer_id)
            .map_err(|_| AppError::invalid_input(entitlements::NOT_FOLLOWING))?;

        entitlements::ensure_may_unfollow(&account, trainer_id)?;

        resources
            .database
            .remove_follow(account.user.id, trainer_id)
            .await?;
        info!(user_id = %account.user.id, trainer_id = %trainer_id, "unfollowed trainer");

        let response = MessageResponse {
            message: "Successfully unfollowed trainer".to_owned(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/follow - list followed trainers
    ///
    /// Follow edges whose trainer record has since disappeared are skipped,
    /// not repaired: referential cleanup on trainer deletion is a documented
    /// gap.
    async fn handle_following(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;

        let mut trainers = Vec::with_capacity(account.following.len());
        for trainer_id in &account.following {
            if let Some(trainer) = resources.database.get_user(*trainer_id).await? {
                trainers.push(FollowedTrainer {
                    id: trainer.id.to_string(),
                    name: trainer.name,
                    email: trainer.email,
                    role: Some(trainer.role.as_str().to_owned()),
                });
            }
        }

        let response = FollowingResponse {
            count: trainers.len(),
            trainers,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/feed - plans from followed trainers, newest first
    async fn handle_feed(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;

        let plans = resources
            .database
            .list_plans_by_trainers(&account.following)
            .await?;

        let feed: Vec<FeedItem> = plans
            .iter()
            .map(|item: &PlanWithTrainer| FeedItem {
                id: item.plan.id.to_string(),
                title: item.plan.title.clone(),
                description: item.plan.description.clone(),
                price: item.plan.price,
                duration: item.plan.duration,
                trainer: TrainerInfo::from(&item.trainer),
                is_purchased: account.is_subscribed_to(item.plan.id),
                created_at: item.plan.created_at.to_rfc3339(),
            })
            .collect();

        let response = FeedResponse {
            count: feed.len(),
            feed,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/trainers - trainer discovery with follow status
    async fn handle_trainers(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let account = authenticate_account(&headers, &resources).await?;

        let trainers = resources.database.list_trainers().await?;
        let listings: Vec<TrainerListing> = trainers
            .iter()
            .map(|trainer| TrainerListing {
                id: trainer.id.to_string(),
                name: trainer.name.clone(),
                email: trainer.email.clone(),
                is_following: account.is_following(trainer.id),
                created_at: trainer.created_at.to_rfc3339(),
            })
            .collect();

        let response = TrainersResponse {
            count: listings.len(),
            trainers: listings,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

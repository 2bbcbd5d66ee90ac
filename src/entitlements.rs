// ABOUTME: Access-control core deriving visibility tiers and permitted mutations
// ABOUTME: Transport-independent rules for ownership, subscription gating, and follow edges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

//! Entitlement rules for (account, plan) pairs.
//!
//! Everything here is a pure decision over already-loaded records: handlers
//! load the requesting [`Account`] and target [`Plan`], ask this module what
//! the account may see or do, and shape the response accordingly. No store
//! or HTTP types leak in.

use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Account, Plan, User};

/// Rejection message for non-trainers creating plans
pub const TRAINERS_ONLY: &str = "Access denied. Trainers only.";
/// Rejection message for updating someone else's plan
pub const NOT_YOUR_PLAN_UPDATE: &str = "You can only update your own plans";
/// Rejection message for deleting someone else's plan
pub const NOT_YOUR_PLAN_DELETE: &str = "You can only delete your own plans";
/// Rejection message for duplicate subscriptions
pub const ALREADY_SUBSCRIBED: &str = "You are already subscribed to this plan";
/// Rejection message for unsubscribing without a subscription
pub const NOT_SUBSCRIBED: &str = "You are not subscribed to this plan";
/// Rejection message for following a missing account
pub const TRAINER_NOT_FOUND: &str = "Trainer not found";
/// Rejection message for following a non-trainer account
pub const ONLY_FOLLOW_TRAINERS: &str = "You can only follow trainers";
/// Rejection message for following oneself
pub const CANNOT_FOLLOW_SELF: &str = "You cannot follow yourself";
/// Rejection message for duplicate follows
pub const ALREADY_FOLLOWING: &str = "You are already following this trainer";
/// Rejection message for unfollowing without a follow edge
pub const NOT_FOLLOWING: &str = "You are not following this trainer";

/// What a read operation may reveal about a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityTier {
    /// Every field, including the description
    Full,
    /// Reduced projection: id, title, price, duration, trainer id + name
    Preview,
}

impl VisibilityTier {
    /// Whether this tier reveals the full record
    #[must_use]
    pub const fn is_full(self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Which plan mutation is being attempted, for ownership rejection wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMutation {
    /// Field updates on an existing plan
    Update,
    /// Removal of an existing plan
    Delete,
}

/// Visibility tier for a plan inside the list read (`GET /plans`)
///
/// FULL for subscribers and for any account holding the trainer role.
/// Trainers therefore see full details on every plan, competitors' included;
/// that is the literal production behavior and is preserved here (flagged as
/// a likely unintended broad grant in DESIGN.md).
#[must_use]
pub fn list_visibility(account: &Account, plan: &Plan) -> VisibilityTier {
    if account.is_subscribed_to(plan.id) || account.user.role.is_trainer() {
        VisibilityTier::Full
    } else {
        VisibilityTier::Preview
    }
}

/// Visibility tier for a single-plan read (`GET /plans/:id`)
///
/// FULL only for the owning trainer and for subscribers. The trainer-role
/// grant of [`list_visibility`] does NOT apply here: a non-owning,
/// non-subscribed trainer is entitled to the preview projection only, which
/// the handler delivers inside the 403 response body.
#[must_use]
pub fn detail_visibility(account: &Account, plan: &Plan) -> VisibilityTier {
    if plan.trainer_id == account.user.id || account.is_subscribed_to(plan.id) {
        VisibilityTier::Full
    } else {
        VisibilityTier::Preview
    }
}

/// Gate plan creation: trainers only
///
/// # Errors
///
/// Returns `PermissionDenied` for accounts without the trainer role.
pub fn ensure_may_create_plan(account: &Account) -> AppResult<()> {
    if account.user.role.is_trainer() {
        Ok(())
    } else {
        Err(AppError::forbidden(TRAINERS_ONLY))
    }
}

/// Gate plan update/delete: owning trainer only
///
/// The caller has already resolved the plan, so absence was handled as 404
/// before this check runs.
///
/// # Errors
///
/// Returns `PermissionDenied` when the requester does not own the plan.
pub fn ensure_owns_plan(account: &Account, plan: &Plan, mutation: PlanMutation) -> AppResult<()> {
    if plan.trainer_id == account.user.id {
        Ok(())
    } else {
        let message = match mutation {
            PlanMutation::Update => NOT_YOUR_PLAN_UPDATE,
            PlanMutation::Delete => NOT_YOUR_PLAN_DELETE,
        };
        Err(AppError::forbidden(message))
    }
}

/// Gate subscribing: any authenticated account, at most once per plan
///
/// # Errors
///
/// Returns `InvalidInput` when the account already holds a subscription to
/// the plan.
pub fn ensure_may_subscribe(account: &Account, plan_id: Uuid) -> AppResult<()> {
    if account.is_subscribed_to(plan_id) {
        Err(AppError::invalid_input(ALREADY_SUBSCRIBED))
    } else {
        Ok(())
    }
}

/// Gate unsubscribing: must currently hold the subscription
///
/// # Errors
///
/// Returns `InvalidInput` when no subscription to the plan exists.
pub fn ensure_may_unsubscribe(account: &Account, plan_id: Uuid) -> AppResult<()> {
    if account.is_subscribed_to(plan_id) {
        Ok(())
    } else {
        Err(AppError::invalid_input(NOT_SUBSCRIBED))
    }
}

/// Gate following, conditions checked in contract order:
/// target exists (404), target is a trainer (400), target is not the
/// requester (400), no existing follow edge (400)
///
/// # Errors
///
/// Returns `ResourceNotFound` or `InvalidInput` per the first violated
/// condition.
pub fn ensure_may_follow<'a>(account: &Account, target: Option<&'a User>) -> AppResult<&'a User> {
    let target = target.ok_or_else(|| AppError::not_found(TRAINER_NOT_FOUND))?;
    if !target.role.is_trainer() {
        return Err(AppError::invalid_input(ONLY_FOLLOW_TRAINERS));
    }
    if target.id == account.user.id {
        return Err(AppError::invalid_input(CANNOT_FOLLOW_SELF));
    }
    if account.is_following(target.id) {
        return Err(AppError::invalid_input(ALREADY_FOLLOWING));
    }
    Ok(target)
}

/// Gate unfollowing: must currently hold the follow edge
///
/// # Errors
///
/// Returns `InvalidInput` when the account does not follow the trainer.
pub fn ensure_may_unfollow(account: &Account, trainer_id: Uuid) -> AppResult<()> {
    if account.is_following(trainer_id) {
        Ok(())
    } else {
        Err(AppError::invalid_input(NOT_FOLLOWING))
    }
}

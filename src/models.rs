// ABOUTME: Common data models for accounts, plans, subscriptions, and follow edges
// ABOUTME: Closed role set and derived membership checks consumed by the entitlement core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role, a closed set of two variants
///
/// The wire and store representation of the regular variant is `"user"`,
/// matching the public API contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular account: subscribes to plans and follows trainers
    #[default]
    User,
    /// Trainer account: publishes and manages plans
    Trainer,
}

impl UserRole {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Trainer => "trainer",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "trainer" => Self::Trainer,
            _ => Self::User,
        }
    }

    /// Strict parse for request payloads, rejecting unknown role names
    #[must_use]
    pub fn parse_strict(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "trainer" => Some(Self::Trainer),
            _ => None,
        }
    }

    /// Whether this role may publish plans
    #[must_use]
    pub const fn is_trainer(self) -> bool {
        matches!(self, Self::Trainer)
    }
}

/// A user or trainer identity record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address, unique case-insensitively, stored lowercased
    pub email: String,
    /// bcrypt password hash, never serialized to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account role, immutable after creation
    pub role: UserRole,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new account record with a fresh id
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }
}

/// A paid (simulated) unlock of one plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Plan that was unlocked
    pub plan_id: Uuid,
    /// When the unlock happened
    pub subscribed_at: DateTime<Utc>,
}

/// An account together with its loaded social and subscription edges
///
/// This is the unit the entitlement model consumes: the identity record plus
/// the trainer ids it follows and the plans it has unlocked. Edges are loaded
/// separately from the `followed_trainers` and `subscriptions` tables.
#[derive(Debug, Clone)]
pub struct Account {
    /// The identity record
    pub user: User,
    /// Trainer account ids this account follows, in follow order
    pub following: Vec<Uuid>,
    /// Plan unlocks held by this account, in subscribe order
    pub subscriptions: Vec<Subscription>,
}

impl Account {
    /// Whether this account holds a subscription to the given plan
    #[must_use]
    pub fn is_subscribed_to(&self, plan_id: Uuid) -> bool {
        self.subscriptions.iter().any(|s| s.plan_id == plan_id)
    }

    /// Whether this account follows the given trainer
    #[must_use]
    pub fn is_following(&self, trainer_id: Uuid) -> bool {
        self.following.contains(&trainer_id)
    }
}

/// A trainer-authored, priced fitness program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Unique identifier
    pub id: Uuid,
    /// Plan title
    pub title: String,
    /// Full plan description, withheld from preview projections
    pub description: String,
    /// Price in the fixed USD unit, non-negative, no upper bound
    pub price: f64,
    /// Program length in days, at least 1
    pub duration: i64,
    /// Owning trainer, never changes after creation
    pub trainer_id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Trainer identity fields joined onto plan reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerRef {
    /// Trainer account id
    pub id: Uuid,
    /// Trainer display name
    pub name: String,
    /// Trainer email
    pub email: String,
}

/// A plan with its owning trainer's identity joined in
#[derive(Debug, Clone)]
pub struct PlanWithTrainer {
    /// The plan record
    pub plan: Plan,
    /// The owning trainer's identity fields
    pub trainer: TrainerRef,
}

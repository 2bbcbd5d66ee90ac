// ABOUTME: Payment capability seam for subscription unlocks
// ABOUTME: Simulated default processor that always succeeds, injectable for real gateways
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Plan;

/// Outcome of a successful charge, echoed back in the subscribe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Always true for receipts; failures are errors, not receipts
    pub success: bool,
    /// Processor transaction reference
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
    /// Amount charged, equal to the plan price
    pub amount: f64,
    /// Fixed currency unit
    pub currency: String,
}

/// A declined or failed charge
#[derive(Debug, Clone, thiserror::Error)]
#[error("Payment failed")]
pub struct PaymentDeclined;

/// Charging capability consulted before a subscription is recorded
///
/// The subscribe handler records the unlock only after a receipt comes back;
/// a declined charge surfaces as a 400 and leaves no subscription row. The
/// default [`SimulatedPaymentProcessor`] never declines, preserving the
/// unconditional-success behavior of the existing contract.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Charge an account for a plan
    ///
    /// # Errors
    ///
    /// Returns [`PaymentDeclined`] when the charge does not go through.
    async fn charge(&self, account_id: Uuid, plan: &Plan) -> Result<PaymentReceipt, PaymentDeclined>;
}

/// Inline payment simulation, no gateway integration
///
/// Fabricates a `TXN<millis>` transaction reference the way the production
/// system does.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedPaymentProcessor;

#[async_trait]
impl PaymentProcessor for SimulatedPaymentProcessor {
    async fn charge(
        &self,
        _account_id: Uuid,
        plan: &Plan,
    ) -> Result<PaymentReceipt, PaymentDeclined> {
        Ok(PaymentReceipt {
            success: true,
            transaction_id: format!("TXN{}", Utc::now().timestamp_millis()),
            amount: plan.price,
            currency: "USD".to_owned(),
        })
    }
}

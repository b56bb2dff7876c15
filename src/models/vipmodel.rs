use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::usermodel::VipTier;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "billing_plan", rename_all = "snake_case")]
#[serde(rename_all = "lowercase")]
pub enum BillingPlan {
    Monthly,
    Yearly,
}

impl BillingPlan {
    pub fn to_str(&self) -> &str {
        match self {
            BillingPlan::Monthly => "monthly",
            BillingPlan::Yearly => "yearly",
        }
    }
}

/// One subscription payment attempt.
///
/// Status is driven by gateway verification; a `completed` status is a
/// necessary but not sufficient precondition for the admin confirmation that
/// actually grants the tier. `confirmed_by`/`confirmed_at` are set exactly
/// once and never cleared.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct VipPayment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tier: VipTier,
    pub plan: BillingPlan,
    /// Amount in minor currency units (kobo).
    pub amount: i64,
    pub reference: String,
    pub paystack_reference: String,
    pub status: PaymentStatus,
    pub payment_date: Option<DateTime<Utc>>,
    pub confirmed_by: Option<Uuid>,
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

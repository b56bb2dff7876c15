use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::{
    usermodel::VipTier,
    vipmodel::{BillingPlan, VipPayment},
};

const PAYMENT_COLUMNS: &str = r#"
    id, user_id, tier, plan, amount, reference, paystack_reference,
    status, payment_date, confirmed_by, confirmed_at, created_at
"#;

/// A completed-but-unconfirmed payment joined with its payer, as shown in
/// the admin confirmation queue.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct PendingConfirmation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub tier: VipTier,
    pub plan: BillingPlan,
    pub amount: i64,
    pub reference: String,
    pub paystack_reference: String,
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait VipPaymentExt {
    async fn create_payment(
        &self,
        user_id: Uuid,
        tier: VipTier,
        plan: BillingPlan,
        amount: i64,
        reference: &str,
        paystack_reference: &str,
    ) -> Result<VipPayment, sqlx::Error>;

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<VipPayment>, sqlx::Error>;

    /// Marks the payment identified by its gateway reference as completed
    /// and stamps the payment date. Idempotent: a record that is already
    /// completed keeps its original payment date. Failed records are
    /// terminal and are never resurrected.
    async fn complete_payment(
        &self,
        paystack_reference: &str,
    ) -> Result<Option<VipPayment>, sqlx::Error>;

    /// Moves a pending payment to failed. Completed records are untouched.
    async fn fail_payment(
        &self,
        paystack_reference: &str,
    ) -> Result<Option<VipPayment>, sqlx::Error>;

    /// The admin confirmation queue: completed, unconfirmed, newest payment
    /// first.
    async fn pending_confirmations(&self) -> Result<Vec<PendingConfirmation>, sqlx::Error>;
}

#[async_trait]
impl VipPaymentExt for DBClient {
    async fn create_payment(
        &self,
        user_id: Uuid,
        tier: VipTier,
        plan: BillingPlan,
        amount: i64,
        reference: &str,
        paystack_reference: &str,
    ) -> Result<VipPayment, sqlx::Error> {
        sqlx::query_as::<_, VipPayment>(&format!(
            r#"
            INSERT INTO vip_payments (user_id, tier, plan, amount, reference, paystack_reference)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(tier)
        .bind(plan)
        .bind(amount)
        .bind(reference)
        .bind(paystack_reference)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<VipPayment>, sqlx::Error> {
        sqlx::query_as::<_, VipPayment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM vip_payments
            WHERE id = $1
            "#
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn complete_payment(
        &self,
        paystack_reference: &str,
    ) -> Result<Option<VipPayment>, sqlx::Error> {
        sqlx::query_as::<_, VipPayment>(&format!(
            r#"
            UPDATE vip_payments
            SET status = 'completed'::payment_status,
                payment_date = COALESCE(payment_date, NOW())
            WHERE paystack_reference = $1
              AND status <> 'failed'::payment_status
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(paystack_reference)
        .fetch_optional(&self.pool)
        .await
    }

    async fn fail_payment(
        &self,
        paystack_reference: &str,
    ) -> Result<Option<VipPayment>, sqlx::Error> {
        sqlx::query_as::<_, VipPayment>(&format!(
            r#"
            UPDATE vip_payments
            SET status = 'failed'::payment_status
            WHERE paystack_reference = $1
              AND status = 'pending'::payment_status
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(paystack_reference)
        .fetch_optional(&self.pool)
        .await
    }

    async fn pending_confirmations(&self) -> Result<Vec<PendingConfirmation>, sqlx::Error> {
        sqlx::query_as::<_, PendingConfirmation>(
            r#"
            SELECT p.id, p.user_id, u.username, u.email,
                   p.tier, p.plan, p.amount, p.reference, p.paystack_reference,
                   p.payment_date, p.created_at
            FROM vip_payments p
            JOIN users u ON u.id = p.user_id
            WHERE p.status = 'completed'::payment_status
              AND p.confirmed_by IS NULL
            ORDER BY p.payment_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

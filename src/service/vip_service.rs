use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    db::vipdb::VipPaymentExt,
    models::{
        usermodel::VipTier,
        vipmodel::{BillingPlan, PaymentStatus, VipPayment},
    },
    service::{
        error::ServiceError,
        paystack::{GatewayStatus, PaymentVerification},
    },
};

/// Parses and validates a (tier, plan) selection. Only vip/vvip crossed with
/// monthly/yearly are purchasable; everything else is a validation error.
pub fn parse_selection(tier: &str, plan: &str) -> Result<(VipTier, BillingPlan), ServiceError> {
    let tier = match tier {
        "vip" => VipTier::Vip,
        "vvip" => VipTier::Vvip,
        _ => {
            return Err(ServiceError::Validation(
                "Invalid tier. Must be vip or vvip".to_string(),
            ))
        }
    };

    let plan = match plan {
        "monthly" => BillingPlan::Monthly,
        "yearly" => BillingPlan::Yearly,
        _ => {
            return Err(ServiceError::Validation(
                "Invalid plan. Must be monthly or yearly".to_string(),
            ))
        }
    };

    Ok((tier, plan))
}

/// Fixed price table in minor currency units (kobo).
pub fn plan_amount(tier: VipTier, plan: BillingPlan) -> Result<i64, ServiceError> {
    match (tier, plan) {
        (VipTier::Vip, BillingPlan::Monthly) => Ok(1_000_000),
        (VipTier::Vip, BillingPlan::Yearly) => Ok(10_000_000),
        (VipTier::Vvip, BillingPlan::Monthly) => Ok(5_000_000),
        (VipTier::Vvip, BillingPlan::Yearly) => Ok(50_000_000),
        (VipTier::None, _) => Err(ServiceError::Validation(
            "Invalid tier. Must be vip or vvip".to_string(),
        )),
    }
}

/// Expiry for a freshly confirmed subscription.
pub fn plan_expiry(plan: BillingPlan, now: DateTime<Utc>) -> DateTime<Utc> {
    match plan {
        BillingPlan::Monthly => now + Months::new(1),
        BillingPlan::Yearly => now + Months::new(12),
    }
}

/// Preconditions for the admin confirmation step. A payment is eligible
/// exactly once: gateway verification must have moved it to `completed`,
/// and no admin may have confirmed it before.
pub fn confirmation_eligibility(payment: &VipPayment) -> Result<(), ServiceError> {
    if payment.status != PaymentStatus::Completed {
        return Err(ServiceError::PaymentNotCompleted);
    }
    if payment.confirmed_by.is_some() {
        return Err(ServiceError::PaymentAlreadyConfirmed);
    }
    Ok(())
}

pub struct VipService {
    db: Arc<DBClient>,
}

impl VipService {
    pub fn new(db: Arc<DBClient>) -> Self {
        Self { db }
    }

    /// Applies the gateway's authoritative verdict to the payment record.
    ///
    /// Success moves the record to `completed` and stamps the payment date;
    /// re-verifying an already completed record is a no-op beyond that.
    /// A failed verdict is terminal; anything else leaves the record pending.
    pub async fn apply_verification(
        &self,
        verification: &PaymentVerification,
    ) -> Result<GatewayStatus, ServiceError> {
        match verification.status {
            GatewayStatus::Success => {
                let updated = self
                    .db
                    .complete_payment(&verification.gateway_reference)
                    .await?;
                if updated.is_none() {
                    tracing::warn!(
                        "verified payment {} has no local record",
                        verification.gateway_reference
                    );
                }
            }
            GatewayStatus::Failed => {
                self.db.fail_payment(&verification.gateway_reference).await?;
            }
            GatewayStatus::Pending => {}
        }

        Ok(verification.status)
    }

    /// The single authoritative point where a tier is granted.
    ///
    /// Confirmation spans two rows (the payment and the payer), so both
    /// updates run inside one transaction: either the admin stamp and the
    /// tier grant both land, or neither does.
    pub async fn confirm_payment(
        &self,
        payment_id: Uuid,
        admin_id: Uuid,
    ) -> Result<VipPayment, ServiceError> {
        let mut tx = self.db.pool.begin().await?;

        let payment = sqlx::query_as::<_, VipPayment>(
            r#"
            SELECT id, user_id, tier, plan, amount, reference, paystack_reference,
                   status, payment_date, confirmed_by, confirmed_at, created_at
            FROM vip_payments
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::PaymentNotFound(payment_id))?;

        confirmation_eligibility(&payment)?;

        let now = Utc::now();
        let expiry = plan_expiry(payment.plan, now);
        let make_public = payment.tier == VipTier::Vvip;

        let confirmed = sqlx::query_as::<_, VipPayment>(
            r#"
            UPDATE vip_payments
            SET confirmed_by = $2,
                confirmed_at = $3
            WHERE id = $1
            RETURNING id, user_id, tier, plan, amount, reference, paystack_reference,
                      status, payment_date, confirmed_by, confirmed_at, created_at
            "#,
        )
        .bind(payment_id)
        .bind(admin_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET vip_tier = $2,
                vip_expiry = $3,
                is_public_profile = is_public_profile OR $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(payment.user_id)
        .bind(payment.tier)
        .bind(expiry)
        .bind(make_public)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "payment {} confirmed by {}: user {} granted {} until {}",
            payment_id,
            admin_id,
            payment.user_id,
            payment.tier.to_str(),
            expiry
        );

        Ok(confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn payment(status: PaymentStatus, confirmed_by: Option<Uuid>) -> VipPayment {
        VipPayment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tier: VipTier::Vip,
            plan: BillingPlan::Monthly,
            amount: 1_000_000,
            reference: "VIP_1714651812345_a1b2c3d4e".to_string(),
            paystack_reference: "ps_ref_123".to_string(),
            status,
            payment_date: None,
            confirmed_by,
            confirmed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn selection_parsing_accepts_only_known_combinations() {
        assert_eq!(
            parse_selection("vip", "monthly").unwrap(),
            (VipTier::Vip, BillingPlan::Monthly)
        );
        assert_eq!(
            parse_selection("vvip", "yearly").unwrap(),
            (VipTier::Vvip, BillingPlan::Yearly)
        );

        assert!(matches!(
            parse_selection("gold", "monthly"),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            parse_selection("vip", "weekly"),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            parse_selection("none", "monthly"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn price_table_is_fixed() {
        assert_eq!(plan_amount(VipTier::Vip, BillingPlan::Monthly).unwrap(), 1_000_000);
        assert_eq!(plan_amount(VipTier::Vip, BillingPlan::Yearly).unwrap(), 10_000_000);
        assert_eq!(plan_amount(VipTier::Vvip, BillingPlan::Monthly).unwrap(), 5_000_000);
        assert_eq!(plan_amount(VipTier::Vvip, BillingPlan::Yearly).unwrap(), 50_000_000);
        assert!(plan_amount(VipTier::None, BillingPlan::Monthly).is_err());
    }

    #[test]
    fn yearly_expiry_is_one_year_out() {
        let now = Utc::now();
        let expiry = plan_expiry(BillingPlan::Yearly, now);
        assert_eq!(expiry.year(), now.year() + 1);
        // Within a day of the anniversary; month arithmetic clamps day-ends.
        assert!((expiry - now).num_days() >= 365);
        assert!((expiry - now).num_days() <= 366);
    }

    #[test]
    fn monthly_expiry_is_one_month_out() {
        let now = Utc::now();
        let expiry = plan_expiry(BillingPlan::Monthly, now);
        let days = (expiry - now).num_days();
        assert!((28..=31).contains(&days), "got {} days", days);
    }

    #[test]
    fn pending_payment_is_not_eligible_for_confirmation() {
        let p = payment(PaymentStatus::Pending, None);
        assert!(matches!(
            confirmation_eligibility(&p),
            Err(ServiceError::PaymentNotCompleted)
        ));
    }

    #[test]
    fn failed_payment_is_not_eligible_for_confirmation() {
        let p = payment(PaymentStatus::Failed, None);
        assert!(matches!(
            confirmation_eligibility(&p),
            Err(ServiceError::PaymentNotCompleted)
        ));
    }

    #[test]
    fn completed_unconfirmed_payment_is_eligible_exactly_once() {
        let fresh = payment(PaymentStatus::Completed, None);
        assert!(confirmation_eligibility(&fresh).is_ok());

        let already = payment(PaymentStatus::Completed, Some(Uuid::new_v4()));
        assert!(matches!(
            confirmation_eligibility(&already),
            Err(ServiceError::PaymentAlreadyConfirmed)
        ));
    }
}

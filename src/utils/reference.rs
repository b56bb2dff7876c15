use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;

use crate::models::usermodel::VipTier;

/// Generates a payment reference of the form `VIP_1714651812345_a1b2c3d4e`.
///
/// The millisecond timestamp plus a 9-character random suffix makes a
/// collision with any existing reference practically impossible; the
/// database additionally enforces uniqueness on the column.
pub fn generate_reference(tier: VipTier) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| (rng.sample(Alphanumeric) as char).to_ascii_lowercase())
        .collect();

    format!(
        "{}_{}_{}",
        tier.to_str().to_uppercase(),
        Utc::now().timestamp_millis(),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_expected_shape() {
        let reference = generate_reference(VipTier::Vvip);
        let parts: Vec<&str> = reference.splitn(3, '_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "VVIP");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn consecutive_references_differ() {
        let a = generate_reference(VipTier::Vip);
        let b = generate_reference(VipTier::Vip);
        assert_ne!(a, b);
    }
}

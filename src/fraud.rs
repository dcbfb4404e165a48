//! Amount-tiered risk classification.
//!
//! The analyzer never rejects a payment. It only classifies it so the
//! orchestrator can emit an audit event.

use crate::amount::Amount;
use crate::transaction::UserId;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Which check was run. Amounts below 100 get the light check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Light,
    Heavy,
}

/// Sub-tier inside a [`RiskTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn for_amount(amount: Amount) -> Self {
        if amount.value() < Decimal::ONE_HUNDRED {
            RiskTier::Light
        } else {
            RiskTier::Heavy
        }
    }
}

impl RiskLevel {
    pub fn for_amount(amount: Amount) -> Self {
        let value = amount.value();
        match RiskTier::for_amount(amount) {
            RiskTier::Light if value < Decimal::TEN => RiskLevel::VeryLow,
            RiskTier::Light => RiskLevel::Low,
            RiskTier::Heavy if value < Decimal::ONE_THOUSAND => RiskLevel::Medium,
            RiskTier::Heavy => RiskLevel::High,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Light => f.write_str("light"),
            RiskTier::Heavy => f.write_str("heavy"),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::VeryLow => f.write_str("very low risk"),
            RiskLevel::Low => f.write_str("low risk"),
            RiskLevel::Medium => f.write_str("medium risk"),
            RiskLevel::High => f.write_str("high risk"),
        }
    }
}

/// Outcome of a fraud check, emitted as a risk event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub level: RiskLevel,
    pub user_id: UserId,
    pub amount: Amount,
}

/// Runs the fraud check for `check_level`.
///
/// Returns `None` when the level is zero: the check is skipped entirely.
/// Otherwise the classification depends on `amount` alone.
pub fn assess(check_level: u32, user_id: &UserId, amount: Amount) -> Option<RiskAssessment> {
    if check_level == 0 {
        return None;
    }

    Some(RiskAssessment {
        tier: RiskTier::for_amount(amount),
        level: RiskLevel::for_amount(amount),
        user_id: user_id.clone(),
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_level_zero_skips_check() {
        assert!(assess(0, &UserId::from("1"), amt("5000")).is_none());
    }

    #[test]
    fn test_tier_boundaries() {
        let cases = [
            ("0.01", RiskTier::Light, RiskLevel::VeryLow),
            ("9.9999", RiskTier::Light, RiskLevel::VeryLow),
            ("10", RiskTier::Light, RiskLevel::Low),
            ("99.9999", RiskTier::Light, RiskLevel::Low),
            ("100", RiskTier::Heavy, RiskLevel::Medium),
            ("999.9999", RiskTier::Heavy, RiskLevel::Medium),
            ("1000", RiskTier::Heavy, RiskLevel::High),
            ("250000", RiskTier::Heavy, RiskLevel::High),
        ];

        for (amount, tier, level) in cases {
            let assessment = assess(1, &UserId::from("7"), amt(amount)).unwrap();
            assert_eq!(assessment.tier, tier, "tier for {}", amount);
            assert_eq!(assessment.level, level, "level for {}", amount);
        }
    }

    #[test]
    fn test_check_level_does_not_change_classification() {
        let low = assess(1, &UserId::from("3"), amt("150")).unwrap();
        let high = assess(9, &UserId::from("3"), amt("150")).unwrap();
        assert_eq!(low, high);
    }

    #[test]
    fn test_assessment_carries_user_and_amount() {
        let assessment = assess(2, &UserId::from("u-42"), amt("50")).unwrap();
        assert_eq!(assessment.user_id, UserId::from("u-42"));
        assert_eq!(assessment.amount, amt("50"));
        assert_eq!(assessment.level.to_string(), "low risk");
    }
}

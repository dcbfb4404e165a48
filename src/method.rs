//! Supported payment methods and their metadata rules.
//!
//! The set of methods is closed: every rule below is an exhaustive match, so
//! adding a method forces a decision on its required fields and its gateway
//! endpoint.

use crate::error::{PaymentError, Result};
use crate::gateway::Endpoint;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Method-specific request metadata, field name to value.
pub type Metadata = BTreeMap<String, String>;

/// Metadata key holding the card number.
pub const CARD_NUMBER: &str = "cardNumber";
/// Metadata key holding the card expiry.
pub const EXPIRY: &str = "expiry";
/// Metadata key holding the PayPal account.
pub const PAYPAL_ACCOUNT: &str = "paypalAccount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
}

impl PaymentMethod {
    /// Wire name of the method, as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
        }
    }

    /// Metadata fields that must be present and non-empty.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            PaymentMethod::CreditCard => &[CARD_NUMBER, EXPIRY],
            PaymentMethod::Paypal => &[PAYPAL_ACCOUNT],
        }
    }

    /// Gateway endpoint payments with this method are routed to.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            PaymentMethod::CreditCard => Endpoint::CreditPayments,
            PaymentMethod::Paypal => Endpoint::PaypalPayments,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "paypal" => Ok(PaymentMethod::Paypal),
            other => Err(PaymentError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// Validates a raw method name and its metadata.
///
/// The method is resolved first, so an unsupported method is reported even
/// when its metadata would also be rejected.
///
/// Whitespace-only values count as missing. This is intentionally stricter
/// than a plain non-empty check: a card number of `"  "` is never accepted.
pub fn validate(method: &str, metadata: &Metadata) -> Result<PaymentMethod> {
    let method = PaymentMethod::from_str(method)?;

    for &field in method.required_fields() {
        let present = metadata
            .get(field)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false);

        if !present {
            return Err(PaymentError::InvalidMetadata { method, field });
        }
    }

    Ok(method)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_credit_card() {
        let meta = metadata(&[(CARD_NUMBER, "4111"), (EXPIRY, "12/25")]);
        assert_eq!(
            validate("credit_card", &meta).unwrap(),
            PaymentMethod::CreditCard
        );
    }

    #[test]
    fn test_valid_paypal() {
        let meta = metadata(&[(PAYPAL_ACCOUNT, "buyer@example.com")]);
        assert_eq!(validate("paypal", &meta).unwrap(), PaymentMethod::Paypal);
    }

    #[test]
    fn test_credit_card_missing_expiry() {
        let meta = metadata(&[(CARD_NUMBER, "4111")]);
        match validate("credit_card", &meta) {
            Err(PaymentError::InvalidMetadata { method, field }) => {
                assert_eq!(method, PaymentMethod::CreditCard);
                assert_eq!(field, EXPIRY);
            }
            other => panic!("Expected InvalidMetadata, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let meta = metadata(&[(CARD_NUMBER, ""), (EXPIRY, "12/25")]);
        assert!(matches!(
            validate("credit_card", &meta),
            Err(PaymentError::InvalidMetadata {
                field: CARD_NUMBER,
                ..
            })
        ));

        let meta = metadata(&[(PAYPAL_ACCOUNT, "   ")]);
        assert!(matches!(
            validate("paypal", &meta),
            Err(PaymentError::InvalidMetadata { .. })
        ));
    }

    #[test]
    fn test_paypal_rejects_card_metadata() {
        let meta = metadata(&[(CARD_NUMBER, "123")]);
        let err = validate("paypal", &meta).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid paypal metadata: missing `paypalAccount`"
        );
    }

    #[test]
    fn test_unsupported_method_checked_before_metadata() {
        for method in ["crypto", "", "Credit_Card", "paypal "] {
            match validate(method, &Metadata::new()) {
                Err(PaymentError::UnsupportedMethod { method: m }) => assert_eq!(m, method),
                other => panic!("Expected UnsupportedMethod, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_every_method_is_routed() {
        for method in [PaymentMethod::CreditCard, PaymentMethod::Paypal] {
            assert!(method.endpoint().path().starts_with("/payments/"));
            assert_eq!(PaymentMethod::from_str(method.as_str()).unwrap(), method);
        }
    }
}

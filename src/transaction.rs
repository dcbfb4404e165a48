//! Payment requests and the immutable records produced from them.

use crate::amount::Amount;
use crate::error::{PaymentError, Result};
use crate::method::{Metadata, PaymentMethod};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Opaque user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        UserId(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A raw payment request as supplied by the caller.
///
/// `method` is kept as the caller's string so that unsupported methods can be
/// reported by name.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub amount: Amount,
    pub currency: String,
    pub user_id: UserId,
    pub method: String,
    pub metadata: Metadata,
    pub discount_code: Option<String>,
    /// Zero disables the fraud check.
    pub fraud_check_level: u32,
}

impl PaymentRequest {
    /// Creates a request with empty metadata, no discount and no fraud check.
    pub fn new(
        amount: Amount,
        currency: impl Into<String>,
        user_id: impl Into<UserId>,
        method: impl Into<String>,
    ) -> Self {
        PaymentRequest {
            amount,
            currency: currency.into(),
            user_id: user_id.into(),
            method: method.into(),
            metadata: Metadata::new(),
            discount_code: None,
            fraud_check_level: 0,
        }
    }

    pub fn with_metadata(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(field.into(), value.into());
        self
    }

    pub fn with_discount(mut self, code: impl Into<String>) -> Self {
        self.discount_code = Some(code.into());
        self
    }

    pub fn with_fraud_check(mut self, level: u32) -> Self {
        self.fraud_check_level = level;
        self
    }
}

/// A completed payment record.
///
/// Built once per successful payment and never modified; fields are only
/// reachable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    user_id: UserId,
    original_amount: Amount,
    final_amount: Amount,
    currency: String,
    payment_method: PaymentMethod,
    metadata: Metadata,
    discount_code: Option<String>,
    fraud_checked: u32,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Assembles the record for a validated request.
    ///
    /// `final_amount` is the discounted and converted amount. Metadata is
    /// copied so later changes to the request do not reach the record, and
    /// the timestamp is taken now rather than when the request was made.
    pub fn build(request: &PaymentRequest, method: PaymentMethod, final_amount: Amount) -> Self {
        Transaction {
            user_id: request.user_id.clone(),
            original_amount: request.amount,
            final_amount,
            currency: request.currency.clone(),
            payment_method: method,
            metadata: request.metadata.clone(),
            discount_code: request.discount_code.clone().filter(|c| !c.is_empty()),
            fraud_checked: request.fraud_check_level,
            timestamp: Utc::now(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn original_amount(&self) -> Amount {
        self.original_amount
    }

    pub fn final_amount(&self) -> Amount {
        self.final_amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn discount_code(&self) -> Option<&str> {
        self.discount_code.as_deref()
    }

    /// The fraud check level that was applied (0 when skipped).
    pub fn fraud_checked(&self) -> u32 {
        self.fraud_checked
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A refund record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    transaction_id: String,
    user_id: UserId,
    reason: String,
    amount: Amount,
    currency: String,
    metadata: Metadata,
    date: DateTime<Utc>,
    net_amount: Amount,
}

impl Refund {
    /// Fee withheld from every refund (5%).
    pub fn fee_rate() -> rust_decimal::Decimal {
        rust_decimal::Decimal::new(5, 2)
    }

    /// Builds the refund record, deriving the net amount after the fee.
    ///
    /// Fails with `AmountOverflow` if the fee cannot be computed.
    pub fn build(
        transaction_id: impl Into<String>,
        user_id: UserId,
        reason: impl Into<String>,
        amount: Amount,
        currency: impl Into<String>,
        metadata: Metadata,
    ) -> Result<Self> {
        let net_amount = amount
            .scale_by(Self::fee_rate())
            .and_then(|fee| amount.checked_sub(fee))
            .ok_or(PaymentError::AmountOverflow {
                amount,
                operation: "refund fee",
            })?;

        Ok(Refund {
            transaction_id: transaction_id.into(),
            user_id,
            reason: reason.into(),
            amount,
            currency: currency.into(),
            metadata,
            date: Utc::now(),
            net_amount,
        })
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn net_amount(&self) -> Amount {
        self.net_amount
    }
}

//! Single-rate currency conversion.
//!
//! This is a placeholder for a real rate source: every non-base currency is
//! converted with the same configured rate. A production system would inject
//! a lookup keyed by currency pair instead.

use crate::amount::Amount;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;

/// Currency code that is never converted.
pub const BASE_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyConverter {
    rate: Decimal,
}

impl CurrencyConverter {
    /// Creates a converter. The rate is validated by `ProcessorConfig`.
    pub fn new(rate: Decimal) -> Self {
        CurrencyConverter { rate }
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Converts `amount` into the base currency. Fails only on overflow.
    pub fn convert(&self, amount: Amount, currency: &str) -> Result<Amount> {
        if currency == BASE_CURRENCY {
            return Ok(amount);
        }

        amount
            .scale_by(self.rate)
            .ok_or(PaymentError::AmountOverflow {
                amount,
                operation: "currency conversion",
            })
    }
}

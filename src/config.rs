//! Processor configuration.
//!
//! Built once and handed to the processor by value; nothing in it changes
//! afterwards, so a processor can be shared between threads without locking.

use crate::discount::{DiscountRule, DiscountTable};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use std::env::{self, VarError};
use std::str::FromStr;

/// Environment variable overriding the conversion rate.
pub const CONVERSION_RATE_VAR: &str = "PAYMENT_CONVERSION_RATE";

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorConfig {
    conversion_rate: Decimal,
    discounts: DiscountTable,
}

impl ProcessorConfig {
    /// Default conversion rate applied to non-base currencies.
    pub fn default_conversion_rate() -> Decimal {
        Decimal::new(12, 1)
    }

    /// Creates a configuration with the given rate and the default discount table.
    ///
    /// Rates must be strictly positive.
    pub fn new(conversion_rate: Decimal) -> Result<Self> {
        if conversion_rate <= Decimal::ZERO {
            return Err(PaymentError::InvalidConfig(format!(
                "conversion rate must be positive, got {}",
                conversion_rate
            )));
        }

        Ok(ProcessorConfig {
            conversion_rate,
            discounts: DiscountTable::default(),
        })
    }

    /// Reads the conversion rate from `PAYMENT_CONVERSION_RATE`, if set.
    ///
    /// An unset variable yields the defaults; a set but non-UTF-8 value is
    /// rejected like any other malformed rate.
    pub fn from_env() -> Result<Self> {
        Self::from_var(env::var(CONVERSION_RATE_VAR))
    }

    fn from_var(var: std::result::Result<String, VarError>) -> Result<Self> {
        match var {
            Ok(raw) => Self::new(parse_rate(&raw)?),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(raw)) => Err(PaymentError::InvalidConfig(format!(
                "{} is not valid unicode: {:?}",
                CONVERSION_RATE_VAR, raw
            ))),
        }
    }

    /// Registers (or replaces) a discount code.
    pub fn with_discount(mut self, code: impl Into<String>, rule: DiscountRule) -> Self {
        self.discounts.insert(code, rule);
        self
    }

    /// Drops a discount code from the table.
    pub fn without_discount(mut self, code: &str) -> Self {
        self.discounts.remove(code);
        self
    }

    /// Replaces the whole discount table.
    pub fn with_discount_table(mut self, discounts: DiscountTable) -> Self {
        self.discounts = discounts;
        self
    }

    pub fn conversion_rate(&self) -> Decimal {
        self.conversion_rate
    }

    pub fn discounts(&self) -> &DiscountTable {
        &self.discounts
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            conversion_rate: Self::default_conversion_rate(),
            discounts: DiscountTable::default(),
        }
    }
}

fn parse_rate(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| {
        PaymentError::InvalidConfig(format!(
            "{} is not a decimal ({:?}): {}",
            CONVERSION_RATE_VAR, raw, e
        ))
    })
}

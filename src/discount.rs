//! Discount rules and the code-keyed rule table.

use crate::amount::Amount;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A pure amount transform selected by a discount code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountRule {
    /// Multiply the amount by the factor (`0.8` is 20% off).
    Multiply(Decimal),

    /// Subtract a flat amount, flooring the result at zero.
    ///
    /// A plain subtraction would let `WELCOME10` turn a 5.00 charge into
    /// -5.00; the floor is intentional and a discount never yields a credit.
    Subtract(Amount),
}

impl DiscountRule {
    pub fn apply(&self, amount: Amount) -> Result<Amount> {
        let discounted = match *self {
            DiscountRule::Multiply(factor) => amount.scale_by(factor),
            DiscountRule::Subtract(flat) => amount
                .checked_sub(flat)
                .map(|rest| rest.max(Amount::ZERO)),
        };

        discounted.ok_or(PaymentError::AmountOverflow {
            amount,
            operation: "discount",
        })
    }
}

/// Code to rule mapping, fixed once the processor is built.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountTable {
    rules: HashMap<String, DiscountRule>,
}

impl DiscountTable {
    /// An empty table: every code is ignored.
    pub fn empty() -> Self {
        DiscountTable {
            rules: HashMap::new(),
        }
    }

    pub fn insert(&mut self, code: impl Into<String>, rule: DiscountRule) {
        self.rules.insert(code.into(), rule);
    }

    pub fn remove(&mut self, code: &str) -> Option<DiscountRule> {
        self.rules.remove(code)
    }

    pub fn get(&self, code: &str) -> Option<&DiscountRule> {
        self.rules.get(code)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies the rule registered for `code`.
    ///
    /// A missing or empty code and an unknown code all leave the amount
    /// unchanged. Unknown codes are not an error; only arithmetic overflow is.
    pub fn apply(&self, amount: Amount, code: Option<&str>) -> Result<Amount> {
        match code.filter(|c| !c.is_empty()).and_then(|c| self.get(c)) {
            Some(rule) => rule.apply(amount),
            None => Ok(amount),
        }
    }
}

impl Default for DiscountTable {
    /// `SUMMER20` takes 20% off, `WELCOME10` takes 10 off.
    fn default() -> Self {
        let mut table = DiscountTable::empty();
        table.insert("SUMMER20", DiscountRule::Multiply(Decimal::new(8, 1)));
        table.insert("WELCOME10", DiscountRule::Subtract(Amount::from(10)));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_default_codes() {
        let table = DiscountTable::default();
        assert_eq!(table.apply(amt("100"), Some("SUMMER20")).unwrap(), amt("80"));
        assert_eq!(table.apply(amt("50"), Some("WELCOME10")).unwrap(), amt("40"));
    }

    #[test]
    fn test_missing_or_empty_code_is_identity() {
        let table = DiscountTable::default();
        assert_eq!(table.apply(amt("42.5"), None).unwrap(), amt("42.5"));
        assert_eq!(table.apply(amt("42.5"), Some("")).unwrap(), amt("42.5"));
    }

    #[test]
    fn test_unknown_code_is_ignored_not_rejected() {
        let table = DiscountTable::default();
        assert_eq!(table.apply(amt("100"), Some("BOGUS")).unwrap(), amt("100"));
        // codes are case sensitive
        assert_eq!(table.apply(amt("100"), Some("summer20")).unwrap(), amt("100"));
    }

    #[test]
    fn test_flat_discount_never_goes_negative() {
        let table = DiscountTable::default();
        assert_eq!(table.apply(amt("5"), Some("WELCOME10")).unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_overflowing_discount_is_an_error() {
        let mut table = DiscountTable::empty();
        table.insert("DOUBLE", DiscountRule::Multiply(Decimal::TWO));
        table.insert("NEGATIVE", DiscountRule::Subtract(Amount::new(Decimal::MIN)));

        let max = Amount::new(Decimal::MAX);
        assert!(matches!(
            table.apply(max, Some("DOUBLE")),
            Err(PaymentError::AmountOverflow {
                operation: "discount",
                ..
            })
        ));
        assert!(table.apply(max, Some("NEGATIVE")).is_err());
    }

    #[test]
    fn test_table_is_extensible() {
        let mut table = DiscountTable::default();
        table.insert("HALF", DiscountRule::Multiply(Decimal::new(5, 1)));
        table.remove("WELCOME10");

        assert_eq!(table.len(), 2);
        assert_eq!(table.apply(amt("30"), Some("HALF")).unwrap(), amt("15"));
        assert_eq!(table.apply(amt("30"), Some("WELCOME10")).unwrap(), amt("30"));
    }
}

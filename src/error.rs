//! Error types for the payment orchestrator.

use crate::amount::Amount;
use crate::gateway::GatewayError;
use crate::method::PaymentMethod;
use thiserror::Error;

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Errors that can occur while processing a payment or refund.
///
/// Validation errors are raised before any side effect. Gateway errors are
/// raised after the transaction record has been assembled and abort the
/// call before notification and analytics run.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// The requested payment method is not in the supported set
    #[error("Unsupported payment method: {method}")]
    UnsupportedMethod { method: String },

    /// A field required by the payment method is missing or empty
    #[error("Invalid {method} metadata: missing `{field}`")]
    InvalidMetadata {
        method: PaymentMethod,
        field: &'static str,
    },

    /// Payment and refund amounts must be strictly positive
    #[error("Amount must be positive, got {amount}")]
    InvalidAmount { amount: Amount },

    /// Discount, conversion or fee arithmetic exceeded the decimal range
    #[error("Amount {amount} overflows during {operation}")]
    AmountOverflow {
        amount: Amount,
        operation: &'static str,
    },

    /// The gateway collaborator failed; the source is passed through unchanged
    #[error("Gateway dispatch to {endpoint} failed: {source}")]
    GatewayDispatch {
        endpoint: &'static str,
        #[source]
        source: GatewayError,
    },

    /// Processor configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: payment-orchestrator <requests.csv>")]
    MissingArgument,
}

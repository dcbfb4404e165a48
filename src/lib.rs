//! # Payment Orchestrator
//!
//! Turns a raw payment request into a dispatched, immutable transaction
//! record: method-specific metadata validation, a risk-tiered fraud check,
//! an optional discount, currency conversion, gateway dispatch and
//! notification/analytics events. Refunds share the record and dispatch
//! machinery.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: amounts use 4 decimal places via `rust_decimal`
//! - **Closed method set**: validation rules and endpoint routing are exhaustive matches
//! - **Injected collaborators**: the gateway and the event sink are supplied by the caller
//! - **Immutable configuration**: conversion rate and discount table are fixed at construction
//!
//! ## Example
//!
//! ```
//! use payment_orchestrator::{Amount, LoggingGateway, PaymentProcessor, PaymentRequest};
//!
//! let processor = PaymentProcessor::new(LoggingGateway::new());
//! let request = PaymentRequest::new(Amount::from(100), "USD", "1", "credit_card")
//!     .with_metadata("cardNumber", "123")
//!     .with_metadata("expiry", "12/25")
//!     .with_discount("SUMMER20");
//!
//! let tx = processor.process_payment(&request).unwrap();
//! assert_eq!(tx.final_amount().to_string(), "80.0000");
//! ```

pub mod amount;
pub mod batch;
pub mod config;
pub mod currency;
pub mod discount;
pub mod error;
pub mod events;
pub mod fraud;
pub mod gateway;
pub mod method;
pub mod processor;
pub mod transaction;

pub use amount::Amount;
pub use config::ProcessorConfig;
pub use currency::CurrencyConverter;
pub use discount::{DiscountRule, DiscountTable};
pub use error::{PaymentError, Result};
pub use events::{EventSink, LogSink, PaymentEvent, SinkError};
pub use fraud::{RiskAssessment, RiskLevel, RiskTier};
pub use gateway::{
    Endpoint, GatewayError, GatewayPayload, GatewayResponse, LoggingGateway, PaymentGateway,
};
pub use method::{Metadata, PaymentMethod};
pub use processor::PaymentProcessor;
pub use transaction::{PaymentRequest, Refund, Transaction, UserId};

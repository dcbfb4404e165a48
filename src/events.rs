//! Observability events emitted around a payment.

use crate::amount::Amount;
use crate::fraud::RiskAssessment;
use crate::method::PaymentMethod;
use crate::transaction::UserId;
use log::info;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// Result of a fraud check. Only emitted when the check ran.
    RiskAssessed(RiskAssessment),

    /// Confirmation notice for the paying user.
    PaymentConfirmed {
        user_id: UserId,
        amount: Amount,
        currency: String,
    },

    /// Analytics record for a completed payment.
    PaymentRecorded {
        user_id: UserId,
        amount: Amount,
        currency: String,
        method: PaymentMethod,
    },
}

impl PaymentEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentEvent::RiskAssessed(_) => "risk",
            PaymentEvent::PaymentConfirmed { .. } => "notification",
            PaymentEvent::PaymentRecorded { .. } => "analytics",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("event sink failed: {0}")]
pub struct SinkError(pub String);

/// Receiver for observability events.
///
/// Failures are reported back to the orchestrator, which logs them and
/// carries on; a sink can never fail a payment.
pub trait EventSink {
    fn emit(&self, event: &PaymentEvent) -> Result<(), SinkError>;
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn emit(&self, event: &PaymentEvent) -> Result<(), SinkError> {
        (**self).emit(event)
    }
}

/// Default sink: writes every event through the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &PaymentEvent) -> Result<(), SinkError> {
        match event {
            PaymentEvent::RiskAssessed(risk) => info!(
                "{} fraud check for user {} on {}: {}",
                risk.tier, risk.user_id, risk.amount, risk.level
            ),
            PaymentEvent::PaymentConfirmed {
                user_id,
                amount,
                currency,
            } => info!(
                "Notifying user {}: payment of {} {} was successful",
                user_id, amount, currency
            ),
            PaymentEvent::PaymentRecorded {
                user_id,
                amount,
                currency,
                method,
            } => info!(
                "Analytics: user={} amount={} currency={} method={}",
                user_id, amount, currency, method
            ),
        }
        Ok(())
    }
}

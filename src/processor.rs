//! Payment orchestration.
//!
//! `process_payment` runs, in this order and each step gated on the previous
//! one: validation, fraud check, discount, conversion, record assembly,
//! gateway dispatch, then notification and analytics.
//!
//! # Failure policy
//!
//! - Validation errors are returned before anything else happens.
//! - Gateway errors are returned unchanged; no notification or analytics
//!   event is emitted for a failed dispatch.
//! - The fraud check never fails a payment.
//! - Sink failures are captured and reported at warn level. They never turn
//!   a successful payment into an error.

use crate::amount::Amount;
use crate::config::ProcessorConfig;
use crate::currency::CurrencyConverter;
use crate::discount::DiscountTable;
use crate::error::{PaymentError, Result};
use crate::events::{EventSink, LogSink, PaymentEvent};
use crate::fraud;
use crate::gateway::{self, Endpoint, GatewayPayload, PaymentGateway};
use crate::method::{self, Metadata};
use crate::transaction::{PaymentRequest, Refund, Transaction, UserId};
use log::{debug, warn};
use rust_decimal::Decimal;

/// Sequences validation, pricing and dispatch for payments and refunds.
///
/// Holds only the gateway, the event sink and read-only configuration, so
/// separate calls never influence each other.
pub struct PaymentProcessor<G, E = LogSink> {
    gateway: G,
    events: E,
    discounts: DiscountTable,
    converter: CurrencyConverter,
}

impl<G: PaymentGateway> PaymentProcessor<G> {
    /// Creates a processor with the default configuration and [`LogSink`].
    pub fn new(gateway: G) -> Self {
        Self::with_config(gateway, LogSink, ProcessorConfig::default())
    }
}

impl<G: PaymentGateway, E: EventSink> PaymentProcessor<G, E> {
    pub fn with_config(gateway: G, events: E, config: ProcessorConfig) -> Self {
        PaymentProcessor {
            gateway,
            events,
            converter: CurrencyConverter::new(config.conversion_rate()),
            discounts: config.discounts().clone(),
        }
    }

    /// Rate applied to every non-base currency.
    pub fn conversion_rate(&self) -> Decimal {
        self.converter.rate()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Processes a payment and returns the dispatched transaction.
    pub fn process_payment(&self, request: &PaymentRequest) -> Result<Transaction> {
        let method = method::validate(&request.method, &request.metadata)?;
        ensure_positive(request.amount)?;

        if let Some(risk) =
            fraud::assess(request.fraud_check_level, &request.user_id, request.amount)
        {
            self.publish(PaymentEvent::RiskAssessed(risk));
        }

        let discounted = self
            .discounts
            .apply(request.amount, request.discount_code.as_deref())?;
        let final_amount = self.converter.convert(discounted, &request.currency)?;

        let transaction = Transaction::build(request, method, final_amount);

        let response = gateway::dispatch(
            &self.gateway,
            method.endpoint(),
            GatewayPayload::Transaction(&transaction),
        )?;
        debug!(
            "Payment for user {} accepted by gateway as {}",
            transaction.user_id(),
            response.reference
        );

        self.publish(PaymentEvent::PaymentConfirmed {
            user_id: transaction.user_id().clone(),
            amount: transaction.final_amount(),
            currency: transaction.currency().to_string(),
        });
        self.publish(PaymentEvent::PaymentRecorded {
            user_id: transaction.user_id().clone(),
            amount: transaction.final_amount(),
            currency: transaction.currency().to_string(),
            method,
        });

        Ok(transaction)
    }

    /// Issues a refund against `transaction_id`.
    ///
    /// The referenced transaction is not looked up: the processor keeps no
    /// history, so existence, ownership and over-refund checks belong to the
    /// caller. A 5% fee is withheld from the net amount.
    pub fn refund_payment(
        &self,
        transaction_id: &str,
        user_id: impl Into<UserId>,
        reason: &str,
        amount: Amount,
        currency: &str,
        metadata: Metadata,
    ) -> Result<Refund> {
        ensure_positive(amount)?;

        let refund = Refund::build(
            transaction_id,
            user_id.into(),
            reason,
            amount,
            currency,
            metadata,
        )?;

        let response = gateway::dispatch(
            &self.gateway,
            Endpoint::Refunds,
            GatewayPayload::Refund(&refund),
        )?;
        debug!(
            "Refund of {} for transaction {} accepted by gateway as {}",
            refund.net_amount(),
            refund.transaction_id(),
            response.reference
        );

        Ok(refund)
    }

    fn publish(&self, event: PaymentEvent) {
        if let Err(e) = self.events.emit(&event) {
            warn!("Dropped {} event: {}", event.kind(), e);
        }
    }
}

fn ensure_positive(amount: Amount) -> Result<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(PaymentError::InvalidAmount { amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, GatewayResponse, LoggingGateway};
    use crate::method::{CARD_NUMBER, EXPIRY};
    use crate::events::SinkError;
    use std::str::FromStr;

    struct BrokenSink;

    impl EventSink for BrokenSink {
        fn emit(&self, _event: &PaymentEvent) -> std::result::Result<(), SinkError> {
            Err(SinkError("mail relay down".to_string()))
        }
    }

    struct DownGateway;

    impl PaymentGateway for DownGateway {
        fn post(
            &self,
            _endpoint: &str,
            _body: &GatewayPayload<'_>,
        ) -> std::result::Result<GatewayResponse, GatewayError> {
            Err(GatewayError::Unavailable("connection refused".to_string()))
        }
    }

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn card_payment(amount: &str) -> PaymentRequest {
        PaymentRequest::new(amt(amount), "USD", "1", "credit_card")
            .with_metadata(CARD_NUMBER, "123")
            .with_metadata(EXPIRY, "12/25")
    }

    #[test]
    fn test_sink_failures_do_not_fail_payment() {
        let processor =
            PaymentProcessor::with_config(LoggingGateway::new(), BrokenSink, ProcessorConfig::default());

        let tx = processor
            .process_payment(&card_payment("150").with_fraud_check(1))
            .unwrap();

        assert_eq!(tx.final_amount(), amt("150"));
        assert_eq!(processor.gateway().dispatched(), 1);
    }

    #[test]
    fn test_non_positive_amount_rejected_before_dispatch() {
        let processor = PaymentProcessor::new(LoggingGateway::new());

        assert!(matches!(
            processor.process_payment(&card_payment("0")),
            Err(PaymentError::InvalidAmount { .. })
        ));
        assert!(matches!(
            processor.refund_payment("tx", "1", "oops", amt("-1"), "USD", Metadata::new()),
            Err(PaymentError::InvalidAmount { .. })
        ));
        assert_eq!(processor.gateway().dispatched(), 0);
    }

    #[test]
    fn test_gateway_error_surfaces_unchanged() {
        let processor = PaymentProcessor::new(DownGateway);

        match processor.process_payment(&card_payment("10")) {
            Err(PaymentError::GatewayDispatch { endpoint, source }) => {
                assert_eq!(endpoint, "/payments/credit");
                assert_eq!(
                    source,
                    GatewayError::Unavailable("connection refused".to_string())
                );
            }
            other => panic!("Expected GatewayDispatch, got {:?}", other),
        }
    }

    #[test]
    fn test_default_conversion_rate() {
        let processor = PaymentProcessor::new(LoggingGateway::new());
        assert_eq!(processor.conversion_rate(), Decimal::new(12, 1));
    }
}

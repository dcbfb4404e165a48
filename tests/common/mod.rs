//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use payment_orchestrator::{
    Amount, EventSink, GatewayError, GatewayPayload, GatewayResponse, PaymentEvent,
    PaymentGateway, PaymentRequest, SinkError,
};
use std::cell::RefCell;
use std::str::FromStr;

/// A posted request: endpoint plus the JSON body as the gateway saw it.
#[derive(Debug, Clone)]
pub struct Posted {
    pub endpoint: String,
    pub body: serde_json::Value,
}

/// Records every post and answers with a fixed outcome.
#[derive(Default)]
pub struct RecordingGateway {
    pub posts: RefCell<Vec<Posted>>,
    pub failure: Option<GatewayError>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: GatewayError) -> Self {
        RecordingGateway {
            posts: RefCell::new(Vec::new()),
            failure: Some(error),
        }
    }

    pub fn calls(&self) -> usize {
        self.posts.borrow().len()
    }

    pub fn last(&self) -> Option<Posted> {
        self.posts.borrow().last().cloned()
    }
}

impl PaymentGateway for RecordingGateway {
    fn post(
        &self,
        endpoint: &str,
        body: &GatewayPayload<'_>,
    ) -> Result<GatewayResponse, GatewayError> {
        self.posts.borrow_mut().push(Posted {
            endpoint: endpoint.to_string(),
            body: serde_json::to_value(body).unwrap(),
        });

        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(GatewayResponse::new(format!("ref-{}", self.calls()))),
        }
    }
}

/// Collects emitted events, optionally failing every emit afterwards.
#[derive(Default)]
pub struct RecordingSink {
    pub events: RefCell<Vec<PaymentEvent>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        RecordingSink {
            events: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(|e| e.kind()).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &PaymentEvent) -> Result<(), SinkError> {
        self.events.borrow_mut().push(event.clone());
        if self.fail {
            Err(SinkError("sink offline".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn amt(s: &str) -> Amount {
    Amount::from_str(s).unwrap()
}

pub fn card_request(amount: &str, currency: &str) -> PaymentRequest {
    PaymentRequest::new(amt(amount), currency, "1", "credit_card")
        .with_metadata("cardNumber", "123")
        .with_metadata("expiry", "12/25")
}

pub fn paypal_request(amount: &str, currency: &str) -> PaymentRequest {
    PaymentRequest::new(amt(amount), currency, "1", "paypal").with_metadata("paypalAccount", "acc")
}

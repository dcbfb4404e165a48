//! Payment gateway collaborator and endpoint routing.
//!
//! The orchestrator never builds its own transport. Callers hand it a
//! [`PaymentGateway`] and every outbound call goes through [`dispatch`].

use crate::error::{PaymentError, Result};
use crate::transaction::{Refund, Transaction};
use log::{debug, info};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Gateway endpoints known to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CreditPayments,
    PaypalPayments,
    Refunds,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::CreditPayments => "/payments/credit",
            Endpoint::PaypalPayments => "/payments/paypal",
            Endpoint::Refunds => "/payments/refund",
        }
    }
}

/// Body posted to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GatewayPayload<'a> {
    Transaction(&'a Transaction),
    Refund(&'a Refund),
}

/// Acknowledgement returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    /// Gateway-side reference for the posted record.
    pub reference: String,
}

impl GatewayResponse {
    pub fn new(reference: impl Into<String>) -> Self {
        GatewayResponse {
            reference: reference.into(),
        }
    }
}

/// Failure reported by a gateway implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The gateway could not be reached
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    /// The gateway refused the request
    #[error("gateway rejected request ({code}): {message}")]
    Rejected { code: u16, message: String },
}

/// Outbound capability supplied by the caller.
///
/// Calls are blocking. Retries and timeouts are the implementation's concern.
pub trait PaymentGateway {
    fn post(
        &self,
        endpoint: &str,
        body: &GatewayPayload<'_>,
    ) -> std::result::Result<GatewayResponse, GatewayError>;
}

impl<G: PaymentGateway + ?Sized> PaymentGateway for &G {
    fn post(
        &self,
        endpoint: &str,
        body: &GatewayPayload<'_>,
    ) -> std::result::Result<GatewayResponse, GatewayError> {
        (**self).post(endpoint, body)
    }
}

/// Posts `body` to `endpoint`, passing any gateway error through unchanged.
pub fn dispatch<G: PaymentGateway + ?Sized>(
    gateway: &G,
    endpoint: Endpoint,
    body: GatewayPayload<'_>,
) -> Result<GatewayResponse> {
    let path = endpoint.path();
    debug!("Dispatching to {}", path);

    gateway
        .post(path, &body)
        .map_err(|source| PaymentError::GatewayDispatch {
            endpoint: path,
            source,
        })
}

/// An offline gateway that logs each request body as JSON and accepts it.
///
/// References are sequential per instance (`gw-1`, `gw-2`, ...).
#[derive(Debug, Default)]
pub struct LoggingGateway {
    sequence: AtomicU64,
}

impl LoggingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests acknowledged so far.
    pub fn dispatched(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

impl PaymentGateway for LoggingGateway {
    fn post(
        &self,
        endpoint: &str,
        body: &GatewayPayload<'_>,
    ) -> std::result::Result<GatewayResponse, GatewayError> {
        let json = serde_json::to_string(body).map_err(|e| GatewayError::Rejected {
            code: 400,
            message: e.to_string(),
        })?;

        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        info!("POST {} {}", endpoint, json);

        Ok(GatewayResponse::new(format!("gw-{}", id)))
    }
}

//! CSV batch replay.
//!
//! Streams payment and refund rows through a [`PaymentProcessor`] and writes
//! one output row per accepted record. Rejected rows are logged and skipped,
//! processing continues with the next row.

use crate::amount::Amount;
use crate::error::Result;
use crate::events::EventSink;
use crate::gateway::PaymentGateway;
use crate::method::{Metadata, CARD_NUMBER, EXPIRY, PAYPAL_ACCOUNT};
use crate::processor::PaymentProcessor;
use crate::transaction::PaymentRequest;
use csv::{ReaderBuilder, Trim, Writer};
use log::{debug, warn};
use serde::Deserialize;
use std::io::{Read, Write};
use std::str::FromStr;

/// Output header written before any row.
pub const OUTPUT_HEADER: [&str; 6] = [
    "type",
    "user",
    "amount",
    "final_amount",
    "currency",
    "reference",
];

/// Raw row as read from CSV.
///
/// Columns not used by a row type are left empty.
#[derive(Debug, Deserialize)]
pub struct RequestRecord {
    /// `payment` or `refund`
    #[serde(rename = "type")]
    pub kind: String,

    pub user: String,

    pub amount: String,

    pub currency: String,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub card_number: Option<String>,

    #[serde(default)]
    pub expiry: Option<String>,

    #[serde(default)]
    pub paypal_account: Option<String>,

    #[serde(default)]
    pub discount: Option<String>,

    #[serde(default)]
    pub fraud_level: Option<u32>,

    /// Transaction being refunded
    #[serde(default)]
    pub tx: Option<String>,

    #[serde(default)]
    pub reason: Option<String>,
}

/// A parsed row ready for the processor.
#[derive(Debug, Clone)]
pub enum BatchOperation {
    Payment(PaymentRequest),
    Refund {
        transaction_id: String,
        user: String,
        reason: String,
        amount: Amount,
        currency: String,
    },
}

impl RequestRecord {
    /// Parses the raw record.
    ///
    /// Returns `None` for an unknown row type, an unparsable amount or a
    /// refund without a transaction id. Method and metadata problems are left
    /// to the processor so they are reported with their proper error.
    pub fn parse(&self) -> Option<BatchOperation> {
        let amount = Amount::from_str(&self.amount).ok()?;
        let user = self.user.trim().to_string();
        let currency = self.currency.trim().to_string();

        match self.kind.trim().to_lowercase().as_str() {
            "payment" => {
                let mut request = PaymentRequest::new(
                    amount,
                    currency,
                    user,
                    non_empty(&self.method).unwrap_or_default(),
                );
                request.metadata = self.metadata();
                request.discount_code = non_empty(&self.discount);
                request.fraud_check_level = self.fraud_level.unwrap_or(0);
                Some(BatchOperation::Payment(request))
            }
            "refund" => Some(BatchOperation::Refund {
                transaction_id: non_empty(&self.tx)?,
                user,
                reason: non_empty(&self.reason).unwrap_or_default(),
                amount,
                currency,
            }),
            _ => None,
        }
    }

    fn metadata(&self) -> Metadata {
        [
            (CARD_NUMBER, &self.card_number),
            (EXPIRY, &self.expiry),
            (PAYPAL_ACCOUNT, &self.paypal_account),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_empty(value).map(|v| (key.to_string(), v)))
        .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub accepted: usize,
    pub rejected: usize,
}

/// Replays every row from `reader` and writes results to `writer`.
///
/// Only I/O and CSV write failures abort the batch.
pub fn run<R, W, G, E>(
    processor: &PaymentProcessor<G, E>,
    reader: R,
    writer: W,
) -> Result<BatchSummary>
where
    R: Read,
    W: Write,
    G: PaymentGateway,
    E: EventSink,
{
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record(OUTPUT_HEADER)?;

    let mut summary = BatchSummary::default();

    for (row_idx, result) in csv_reader.deserialize::<RequestRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let operation = match result {
            Ok(record) => match record.parse() {
                Some(operation) => operation,
                None => {
                    warn!("Row {}: Failed to parse request record", row_num);
                    summary.rejected += 1;
                    continue;
                }
            },
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
                summary.rejected += 1;
                continue;
            }
        };

        match apply(processor, operation) {
            Ok(row) => {
                csv_writer.write_record(&row)?;
                summary.accepted += 1;
                debug!("Row {}: accepted", row_num);
            }
            Err(e) => {
                warn!("Row {}: {}", row_num, e);
                summary.rejected += 1;
            }
        }
    }

    csv_writer.flush()?;
    Ok(summary)
}

fn apply<G: PaymentGateway, E: EventSink>(
    processor: &PaymentProcessor<G, E>,
    operation: BatchOperation,
) -> Result<[String; 6]> {
    match operation {
        BatchOperation::Payment(request) => {
            let tx = processor.process_payment(&request)?;
            Ok([
                "payment".to_string(),
                tx.user_id().to_string(),
                tx.original_amount().to_string(),
                tx.final_amount().to_string(),
                tx.currency().to_string(),
                tx.payment_method().to_string(),
            ])
        }
        BatchOperation::Refund {
            transaction_id,
            user,
            reason,
            amount,
            currency,
        } => {
            let refund = processor.refund_payment(
                &transaction_id,
                user,
                &reason,
                amount,
                &currency,
                Metadata::new(),
            )?;
            Ok([
                "refund".to_string(),
                refund.user_id().to_string(),
                refund.amount().to_string(),
                refund.net_amount().to_string(),
                refund.currency().to_string(),
                refund.transaction_id().to_string(),
            ])
        }
    }
}

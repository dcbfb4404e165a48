//! Payment Orchestrator CLI
//!
//! Replays a CSV batch of payment and refund requests through the
//! orchestrator against an offline gateway and prints the accepted records.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- requests.csv > accepted.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` to see gateway and event output, `warn` for rejected rows
//! - `PAYMENT_CONVERSION_RATE`: Conversion rate for non-USD currencies (default 1.2)

use log::info;
use payment_orchestrator::{
    batch, LogSink, LoggingGateway, PaymentError, PaymentProcessor, ProcessorConfig, Result,
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(PaymentError::MissingArgument);
    }

    let config = ProcessorConfig::from_env()?;

    let input_path = &args[1];
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let processor = PaymentProcessor::with_config(LoggingGateway::new(), LogSink, config);

    let stdout = io::stdout();
    let handle = stdout.lock();
    let summary = batch::run(&processor, reader, handle)?;

    info!(
        "Batch finished: {} accepted, {} rejected",
        summary.accepted, summary.rejected
    );

    Ok(())
}

//! HTTP logging example
//!
//! Sends batched records to a collector. Point `LOG_COLLECTOR_URL` at any
//! endpoint accepting `POST` with a JSON body; failures are printed to stderr.
//!
//! Run with: cargo run --example http_logging

use rust_log_dispatch::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    let url = std::env::var("LOG_COLLECTOR_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8080/logs".to_string());
    println!("=== Rust Log Dispatch - HTTP Logging Example ===\n");
    println!("Collector: {}\n", url);

    // Batches of 5, and nothing waits longer than 2 seconds
    let backend = HttpBackend::builder(url)
        .batch_size(5)
        .flush_interval(Duration::from_secs(2))
        .timeout(Duration::from_secs(3))
        .build()?;
    let metrics = backend.metrics();

    let logger = Logger::with_defaults();
    logger.add_backend("http", backend)?;

    for i in 0..12 {
        logger.info(format!("Processing item {}", i));
    }
    logger.error("One item failed validation");

    // Ten records go out on size; the rest on the next tick
    std::thread::sleep(Duration::from_millis(2500));

    println!(
        "\nsubmitted={} delivered={} failures={}",
        metrics.records_submitted(),
        metrics.records_delivered(),
        metrics.delivery_failures()
    );

    logger.shutdown()?;
    Ok(())
}

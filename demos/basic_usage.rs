//! Basic logger usage example
//!
//! Demonstrates the level gate, the default console backend and the logging
//! macros.
//!
//! Run with: cargo run --example basic_usage

use rust_log_dispatch::prelude::*;
use rust_log_dispatch::{error, info, warn};

fn main() -> Result<()> {
    println!("=== Rust Log Dispatch - Basic Usage Example ===\n");

    // Every level but DEBUG, printed by the "print" console backend
    let logger = Logger::with_defaults();

    println!("1. Logging at the default levels:");
    logger.debug("This is a debug message (hidden)");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message, with file and line");
    logger.critical("This is a critical message");

    println!("\n2. Toggling levels:");
    logger.enable_level(LogLevel::Debug)?;
    logger.debug("Debug is now enabled");
    logger.disable_level(LogLevel::Info)?;
    logger.info("Info message (hidden)");

    if let Err(e) = logger.enable_level(LogLevel::Warn) {
        println!("   Enabling WARN twice fails: {}", e);
    }

    println!("\n3. Formatting macros:");
    let port = 8080;
    warn!(logger, "Port {} is already in use, trying {}", port, port + 1);
    error!(logger, "Failed after {} attempts", 3);
    logger.enable_level(LogLevel::Info)?;
    info!(logger, "Listening on port {}", port + 1);

    println!("\n4. A second console backend that always shows file and line:");
    logger.add_backend("verbose", ConsoleBackend::with_verbosity(LogLevel::Debug))?;
    logger.info("Printed twice");
    logger.remove_backend("verbose")?;

    logger.shutdown()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}

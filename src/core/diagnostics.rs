//! Reporting of failures inside the logging system itself
//!
//! Internal errors never go back through a [`Logger`](super::Logger): a broken
//! backend would otherwise feed its own failures to itself. They are rendered
//! with the record layout and written straight to standard error.

use super::error::DeliveryError;
use super::log_level::LogLevel;
use super::record::{format_record, CallSite, Record};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Callback invoked with every failed delivery.
pub type ErrorCallback = Arc<dyn Fn(&DeliveryError) + Send + Sync>;

/// Write an internal diagnostic to standard error.
///
/// Does nothing if standard error is unavailable.
#[track_caller]
pub fn report(level: LogLevel, message: impl fmt::Display) {
    let record = Record::new(level, message.to_string(), CallSite::here());
    let _ = writeln!(
        io::stderr(),
        "[LOGGER] {}",
        format_record(LogLevel::Error, &record)
    );
}

/// The callback dispatchers use unless given another one.
pub fn default_error_callback() -> ErrorCallback {
    Arc::new(|err: &DeliveryError| report(LogLevel::Error, err))
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

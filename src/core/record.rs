//! Log record structure

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::panic::Location;
use std::path::Path;

/// Placeholder for call-site data the platform could not provide.
pub const UNKNOWN: &str = "???";

/// Where a log call originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub caller: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub const fn new(caller: &'static str, file: &'static str, line: u32) -> Self {
        Self { caller, file, line }
    }

    /// A call site with nothing known about it.
    pub const fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN, 0)
    }

    /// Capture the file and line of the calling code.
    ///
    /// `Location` carries no function name, so the caller is reported as
    /// [`UNKNOWN`]. The logging macros capture the function as well.
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self::new(UNKNOWN, location.file(), location.line())
    }
}

impl Default for CallSite {
    fn default() -> Self {
        Self::unknown()
    }
}

/// One log event.
///
/// Field order is the wire order: `level`, `caller`, `path`, `file`, `line`,
/// `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    level: LogLevel,
    caller: String,
    path: String,
    file: String,
    line: u32,
    message: String,
}

impl Record {
    /// Build a record from a call site, splitting the source file into its
    /// directory and base name.
    pub fn new(level: LogLevel, message: impl Into<String>, site: CallSite) -> Self {
        let (path, file) = split_source(site.file);
        Self {
            level,
            caller: site.caller.to_string(),
            path,
            file,
            line: site.line,
            message: message.into(),
        }
    }

    /// Build a record from already separated fields.
    pub fn from_parts(
        level: LogLevel,
        caller: impl Into<String>,
        path: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            caller: caller.into(),
            path: path.into(),
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    /// Directory portion of the source location.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Base file name of the source location.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn split_source(source: &str) -> (String, String) {
    let source_path = Path::new(source);
    match source_path.file_name() {
        Some(name) => (
            source_path
                .parent()
                .map(|dir| dir.to_string_lossy().into_owned())
                .unwrap_or_default(),
            name.to_string_lossy().into_owned(),
        ),
        None => (String::new(), source.to_string()),
    }
}

/// Uncolored layout of a record without the timestamp.
pub fn format_record(verbosity: LogLevel, record: &Record) -> String {
    layout(verbosity, record, record.level().to_str())
}

pub(crate) fn layout(verbosity: LogLevel, record: &Record, level: &str) -> String {
    let message = sanitize_message(record.message());
    if record.level() >= verbosity {
        format!(
            "({}) @ {}() {}:{}: {}",
            level,
            record.caller(),
            record.file(),
            record.line(),
            message
        )
    } else {
        format!("({}) @ {}(): {}", level, record.caller(), message)
    }
}

/// Escape line breaks and tabs so one record always prints as one line.
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

//! Console backend implementation

use crate::core::record::layout;
use crate::core::{
    Backend, BackendRegistry, LevelSet, LogLevel, Logger, Record, Result, DEFAULT_BACKEND_NAME,
};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Prints each record as it arrives.
///
/// Records at or above the verbosity level are printed with their file and
/// line; the rest are printed in a compact form without them.
pub struct ConsoleBackend {
    verbosity: LogLevel,
    use_colors: bool,
}

impl ConsoleBackend {
    pub fn new() -> Self {
        Self {
            verbosity: LogLevel::Error,
            use_colors: true,
        }
    }

    pub fn with_verbosity(verbosity: LogLevel) -> Self {
        Self {
            verbosity,
            ..Self::new()
        }
    }

    /// Enable or disable colored level names
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn verbosity(&self) -> LogLevel {
        self.verbosity
    }

    /// Full output line for a record, timestamp included.
    pub fn render(&self, record: &Record) -> String {
        format!(
            "{} {}",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            layout(self.verbosity, record, &self.level_label(record.level()))
        )
    }

    #[cfg(feature = "console")]
    fn level_label(&self, level: LogLevel) -> String {
        if self.use_colors {
            level.to_str().color(level.color_code()).to_string()
        } else {
            level.to_str().to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_label(&self, level: LogLevel) -> String {
        level.to_str().to_string()
    }
}

impl Default for ConsoleBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for ConsoleBackend {
    fn log(&mut self, record: &Record) -> Result<()> {
        let output = self.render(record);

        // Route Error and above to stderr, others to stdout
        if record.level() >= LogLevel::Error {
            writeln!(std::io::stderr(), "{}", output)?;
        } else {
            writeln!(std::io::stdout(), "{}", output)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

impl Logger {
    /// A logger with every level but `Debug` enabled and a console backend
    /// named `"print"` that shows file and line for `Error` and above.
    #[must_use]
    pub fn with_defaults() -> Self {
        let print = ConsoleBackend::with_verbosity(LogLevel::Error);
        Logger::from_parts(
            LevelSet::defaults(),
            BackendRegistry::single(DEFAULT_BACKEND_NAME, Box::new(print)),
        )
    }
}

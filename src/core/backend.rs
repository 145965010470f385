//! Backend trait for log output destinations

use super::{error::Result, record::Record};

/// A destination for records.
///
/// A backend handles each record entirely on its own terms: it may print it
/// synchronously or hand it to a background pipeline and return at once.
pub trait Backend: Send + Sync {
    fn log(&mut self, record: &Record) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Release the backend's resources. Called once when a logger shuts down.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }
}

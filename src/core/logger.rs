//! Main logger implementation

use super::{
    backend::Backend,
    diagnostics,
    error::{LoggerError, Result},
    level_set::LevelSet,
    log_level::LogLevel,
    record::{CallSite, Record},
    registry::BackendRegistry,
};
use parking_lot::Mutex;

/// Name of the console backend installed by [`Logger::with_defaults`].
pub const DEFAULT_BACKEND_NAME: &str = "print";

/// Exit status used after a fatal record has been dispatched.
pub const FATAL_EXIT_CODE: i32 = 1;

struct LoggerState {
    levels: LevelSet,
    backends: BackendRegistry,
}

/// Leveled logger forwarding records to named backends.
///
/// Enabled levels and backends live behind one lock; every call, reads
/// included, serializes through it. Backends run on the calling thread, so a
/// backend that needs to stay off the caller's critical path (such as the HTTP
/// backend) hands records to its own worker.
pub struct Logger {
    state: Mutex<LoggerState>,
}

impl Logger {
    /// A logger with no enabled levels and no backends.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(LevelSet::new(), BackendRegistry::new())
    }

    pub(crate) fn from_parts(levels: LevelSet, backends: BackendRegistry) -> Self {
        Self {
            state: Mutex::new(LoggerState { levels, backends }),
        }
    }

    pub fn enable_level(&self, level: LogLevel) -> Result<()> {
        self.state.lock().levels.enable(level)
    }

    pub fn disable_level(&self, level: LogLevel) -> Result<()> {
        self.state.lock().levels.disable(level)
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.state.lock().levels.contains(level)
    }

    /// Enabled levels, lowest first.
    pub fn enabled_levels(&self) -> Vec<LogLevel> {
        self.state.lock().levels.iter().collect()
    }

    /// Register a backend under a name that is not already taken.
    pub fn add_backend<B: Backend + 'static>(&self, name: impl Into<String>, backend: B) -> Result<()> {
        self.add_boxed_backend(name, Box::new(backend))
    }

    pub fn add_boxed_backend(&self, name: impl Into<String>, backend: Box<dyn Backend>) -> Result<()> {
        self.state.lock().backends.add(name, backend)
    }

    /// Unregister a backend and hand it back to the caller.
    pub fn remove_backend(&self, name: &str) -> Result<Box<dyn Backend>> {
        self.state.lock().backends.remove(name)
    }

    /// Run `f` against the named backend while holding the logger lock.
    pub fn with_backend<R>(&self, name: &str, f: impl FnOnce(&mut dyn Backend) -> R) -> Result<R> {
        let mut state = self.state.lock();
        let backend = state.backends.get_mut(name)?;
        Ok(f(backend))
    }

    pub fn has_backend(&self, name: &str) -> bool {
        self.state.lock().backends.contains(name)
    }

    pub fn backend_names(&self) -> Vec<String> {
        self.state.lock().backends.names().map(String::from).collect()
    }

    /// Log a message, attributing it to the calling file and line.
    ///
    /// A `Fatal` message terminates the process after dispatch, whether or not
    /// `Fatal` is enabled.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.log_at(level, message, CallSite::here());
    }

    /// Log a message with an explicit call site.
    pub fn log_at(&self, level: LogLevel, message: impl Into<String>, site: CallSite) {
        self.dispatch(level, message, site);
        if level == LogLevel::Fatal {
            self.terminate();
        }
    }

    /// Build the record and hand it to every backend if the level is enabled.
    fn dispatch(&self, level: LogLevel, message: impl Into<String>, site: CallSite) {
        let mut state = self.state.lock();
        if !state.levels.contains(level) {
            return;
        }

        let record = Record::new(level, message, site);
        for (name, e) in state.backends.dispatch(&record) {
            diagnostics::report(
                LogLevel::Error,
                format!("backend '{}' failed to log record: {}", name, e),
            );
        }
    }

    fn terminate(&self) -> ! {
        if let Err(e) = self.flush() {
            diagnostics::report(LogLevel::Error, format!("flush before exit failed: {}", e));
        }
        std::process::exit(FATAL_EXIT_CODE);
    }

    /// Flush every backend, returning the first failure.
    pub fn flush(&self) -> Result<()> {
        let failures = self.state.lock().backends.flush_all();
        match failures.into_iter().next() {
            Some((_, e)) => Err(e),
            None => Ok(()),
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Critical, message);
    }

    /// Log at `Fatal`, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        self.log(LogLevel::Fatal, message);
        unreachable!("fatal log terminates the process")
    }

    /// Unregister and close every backend.
    ///
    /// Network backends stop their dispatchers here; records they still
    /// buffer are discarded. Returns the first close failure, after closing
    /// all of them.
    pub fn shutdown(self) -> Result<()> {
        let backends = self.state.lock().backends.drain();

        let mut first_error: Option<LoggerError> = None;
        for (name, mut backend) in backends {
            if let Err(e) = backend.close() {
                diagnostics::report(
                    LogLevel::Error,
                    format!("backend '{}' failed to close: {}", name, e),
                );
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        for (name, e) in self.state.get_mut().backends.flush_all() {
            diagnostics::report(
                LogLevel::Error,
                format!("backend '{}' failed to flush during shutdown: {}", name, e),
            );
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Logger")
            .field("levels", &state.levels)
            .field("backends", &state.backends)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_log_dispatch::prelude::*;
///
/// let logger = Logger::builder()
///     .default_levels()
///     .level(LogLevel::Debug)
///     .backend("console", ConsoleBackend::with_verbosity(LogLevel::Warn))
///     .build()
///     .unwrap();
///
/// assert!(logger.is_enabled(LogLevel::Debug));
/// ```
pub struct LoggerBuilder {
    levels: Vec<LogLevel>,
    backends: Vec<(String, Box<dyn Backend>)>,
}

impl LoggerBuilder {
    /// Create a new builder with no levels and no backends
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            backends: Vec::new(),
        }
    }

    /// Enable a level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.levels.push(level);
        self
    }

    /// Enable every level but `Debug`
    #[must_use = "builder methods return a new value"]
    pub fn default_levels(mut self) -> Self {
        self.levels.extend(LevelSet::defaults().iter());
        self
    }

    /// Register a backend under a name
    #[must_use = "builder methods return a new value"]
    pub fn backend<B: Backend + 'static>(mut self, name: impl Into<String>, backend: B) -> Self {
        self.backends.push((name.into(), Box::new(backend)));
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// Fails if a level is enabled twice or two backends share a name
    pub fn build(self) -> Result<Logger> {
        let mut levels = LevelSet::new();
        for level in self.levels {
            levels.enable(level)?;
        }

        let mut backends = BackendRegistry::new();
        for (name, backend) in self.backends {
            backends.add(name, backend)?;
        }

        Ok(Logger::from_parts(levels, backends))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

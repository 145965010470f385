//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments like `format!` and record the enclosing
//! function, file and line as the call site.
//!
//! # Examples
//!
//! ```
//! use rust_log_dispatch::prelude::*;
//! use rust_log_dispatch::info;
//!
//! let logger = Logger::new();
//! logger.enable_level(LogLevel::Info).unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Path of the enclosing function, such as `my_app::server::run`.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        name.strip_suffix("::__here").unwrap_or(name)
    }};
}

/// Capture the current function, file and line as a [`CallSite`](crate::core::CallSite).
///
/// # Examples
///
/// ```
/// use rust_log_dispatch::call_site;
///
/// fn handler() -> rust_log_dispatch::CallSite {
///     call_site!()
/// }
///
/// assert!(handler().caller.ends_with("handler"));
/// ```
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::core::CallSite::new($crate::__function_name!(), file!(), line!())
    };
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let logger = Logger::with_defaults();
/// use rust_log_dispatch::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at($level, format!($($arg)+), $crate::call_site!())
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let logger = Logger::with_defaults();
/// # logger.enable_level(LogLevel::Debug).unwrap();
/// use rust_log_dispatch::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let logger = Logger::with_defaults();
/// use rust_log_dispatch::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

/// Log a fatal-level message, then exit the process with status 1.
///
/// # Examples
///
/// ```no_run
/// # use rust_log_dispatch::prelude::*;
/// # let logger = Logger::with_defaults();
/// use rust_log_dispatch::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

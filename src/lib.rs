//! # Rust Log Dispatch
//!
//! A leveled logging facade that forwards records, enriched with their call
//! site, to named backends.
//!
//! ## Features
//!
//! - **Level Gate**: Each level is enabled or disabled explicitly
//! - **Pluggable Backends**: Console, HTTP, and custom backends
//! - **Batched Delivery**: The HTTP backend coalesces records and POSTs them on
//!   size or time, off the caller's thread
//! - **Owned State**: No globals; a `Logger` is created and shut down explicitly

pub mod backends;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::backends::ConsoleBackend;
    #[cfg(feature = "http")]
    pub use crate::backends::{HttpBackend, HttpBackendConfig};
    pub use crate::core::{
        Backend, Batch, CallSite, Deliver, DeliveryError, Dispatcher, DispatcherConfig,
        DispatcherMetrics, LevelSet, LogLevel, Logger, LoggerBuilder, LoggerError, Record, Result,
    };
}

pub use backends::ConsoleBackend;
#[cfg(feature = "http")]
pub use backends::{HttpBackend, HttpBackendConfig};
pub use core::{
    Backend, Batch, CallSite, Deliver, DeliveryError, Dispatcher, DispatcherConfig,
    DispatcherMetrics, DispatcherState, LevelSet, LogLevel, Logger, LoggerBuilder, LoggerError,
    Record, Result,
};

//! Core logger types and traits

pub mod backend;
pub mod delivery;
pub mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod level_set;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod registry;

pub use backend::Backend;
pub use delivery::{encode_batch, Batch, Deliver};
pub use diagnostics::ErrorCallback;
pub use dispatcher::{
    Dispatcher, DispatcherConfig, DispatcherState, DEFAULT_FLUSH_INTERVAL, DEFAULT_QUEUE_CAPACITY,
};
pub use error::{DeliveryError, LoggerError, Result};
pub use level_set::LevelSet;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_BACKEND_NAME, FATAL_EXIT_CODE};
pub use metrics::DispatcherMetrics;
pub use record::{format_record, CallSite, Record, UNKNOWN};
pub use registry::BackendRegistry;

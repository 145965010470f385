//! Backend implementations

pub mod console;
#[cfg(feature = "http")]
pub mod http;

pub use console::ConsoleBackend;
#[cfg(feature = "http")]
pub use http::{HttpBackend, HttpBackendBuilder, HttpBackendConfig, HttpDelivery};

pub use crate::core::Backend;

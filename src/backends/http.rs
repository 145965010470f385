//! HTTP backend for remote logging
//!
//! Records are queued on a [`Dispatcher`] and POSTed as JSON batches to a
//! collector URL. Logging never waits on the network; it only waits when the
//! queue is full.

use crate::core::diagnostics::ErrorCallback;
use crate::core::{
    encode_batch, Backend, Batch, Deliver, DeliveryError, Dispatcher, DispatcherConfig,
    DispatcherMetrics, LoggerError, Record, Result, DEFAULT_FLUSH_INTERVAL,
    DEFAULT_QUEUE_CAPACITY,
};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// One POST of an encoded batch to a fixed URL.
///
/// Serialization failures, transport failures and non-2xx responses all
/// become a [`DeliveryError`]. Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpDelivery {
    client: Client,
    url: String,
}

impl HttpDelivery {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// # Errors
    ///
    /// Returns error if the URL does not parse or the client cannot be built
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        reqwest::Url::parse(&url)
            .map_err(|e| LoggerError::config("HttpDelivery", format!("invalid url '{}': {}", url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoggerError::config("HttpDelivery", e.to_string()))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Deliver for HttpDelivery {
    fn deliver(&mut self, batch: &Batch) -> std::result::Result<(), DeliveryError> {
        let body = encode_batch(batch)?;

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| DeliveryError::transport(&self.url, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::status(&self.url, status.as_u16()))
        }
    }
}

/// Serializable settings for an [`HttpBackend`].
///
/// Durations are in milliseconds; a zero flush interval falls back to one
/// second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpBackendConfig {
    pub url: String,
    pub batch_size: usize,
    pub queue_capacity: usize,
    pub flush_interval_ms: u64,
    pub timeout_ms: u64,
}

impl HttpBackendConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig::new(self.batch_size, Duration::from_millis(self.flush_interval_ms))
            .with_queue_capacity(self.queue_capacity)
    }
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            batch_size: 0,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            flush_interval_ms: whole_millis(DEFAULT_FLUSH_INTERVAL),
            timeout_ms: whole_millis(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

/// Milliseconds for the serializable config. A non-zero duration under a
/// millisecond rounds up to 1 so it never reads as "unset"; overlong values
/// saturate.
fn whole_millis(duration: Duration) -> u64 {
    match u64::try_from(duration.as_millis()) {
        Ok(0) if !duration.is_zero() => 1,
        Ok(ms) => ms,
        Err(_) => u64::MAX,
    }
}

/// Backend that POSTs batched records as JSON
///
/// # Example
///
/// ```no_run
/// use rust_log_dispatch::backends::HttpBackend;
/// use rust_log_dispatch::prelude::*;
/// use std::time::Duration;
///
/// let backend = HttpBackend::new("http://127.0.0.1:8080/logs", 20, Duration::from_secs(2))
///     .expect("invalid collector url");
///
/// let logger = Logger::with_defaults();
/// logger.add_backend("http", backend).unwrap();
/// logger.info("This log will be sent to 127.0.0.1:8080");
/// ```
pub struct HttpBackend {
    dispatcher: Dispatcher,
    url: String,
}

impl HttpBackend {
    /// Create and start an HTTP backend
    ///
    /// # Arguments
    ///
    /// * `url` - Collector URL receiving the POSTs
    /// * `batch_size` - Records per POST; 0 sends every record on its own
    /// * `flush_interval` - Longest a record waits in a partial batch; zero means one second
    pub fn new(url: impl Into<String>, batch_size: usize, flush_interval: Duration) -> Result<Self> {
        Self::builder(url)
            .batch_size(batch_size)
            .flush_interval(flush_interval)
            .build()
    }

    pub fn from_config(config: HttpBackendConfig) -> Result<Self> {
        HttpBackendBuilder {
            config,
            on_error: None,
        }
        .build()
    }

    #[must_use]
    pub fn builder(url: impl Into<String>) -> HttpBackendBuilder {
        HttpBackendBuilder::new(url)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn metrics(&self) -> Arc<DispatcherMetrics> {
        self.dispatcher.metrics_handle()
    }

    /// Stop the underlying dispatcher. Buffered records are discarded.
    pub fn stop(&self) {
        self.dispatcher.stop();
    }
}

impl Backend for HttpBackend {
    fn log(&mut self, record: &Record) -> Result<()> {
        self.dispatcher.submit(record.clone())
    }

    /// Delivery runs on the dispatcher's own triggers; there is nothing to
    /// force out here.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }

    fn close(&mut self) -> Result<()> {
        self.dispatcher.stop();
        Ok(())
    }
}

/// Builder for [`HttpBackend`]
pub struct HttpBackendBuilder {
    config: HttpBackendConfig,
    on_error: Option<ErrorCallback>,
}

impl HttpBackendBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            config: HttpBackendConfig::new(url),
            on_error: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval_ms = whole_millis(interval);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = whole_millis(timeout);
        self
    }

    /// Receive delivery failures instead of having them printed to stderr
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Validate the settings and start the backend's dispatcher
    pub fn build(self) -> Result<HttpBackend> {
        let Self { config, on_error } = self;
        if config.timeout_ms == 0 {
            return Err(LoggerError::config("HttpBackend", "timeout must be positive"));
        }

        let delivery =
            HttpDelivery::with_timeout(config.url.clone(), Duration::from_millis(config.timeout_ms))?;
        let mut dispatcher = Dispatcher::new(config.dispatcher_config(), delivery);
        if let Some(callback) = on_error {
            dispatcher = dispatcher.on_error(callback);
        }
        dispatcher.start()?;

        Ok(HttpBackend {
            dispatcher,
            url: config.url,
        })
    }
}

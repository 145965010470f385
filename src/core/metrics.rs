//! Dispatcher metrics for observability
//!
//! Counters describing how records move through a dispatcher: how many were
//! accepted, delivered, or lost to failed deliveries and shutdown.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for one dispatcher
///
/// # Example
///
/// ```
/// use rust_log_dispatch::DispatcherMetrics;
///
/// let metrics = DispatcherMetrics::new();
///
/// metrics.record_submitted();
/// metrics.record_delivered(1);
///
/// assert_eq!(metrics.records_submitted(), 1);
/// assert_eq!(metrics.batches_delivered(), 1);
/// assert_eq!(metrics.records_delivered(), 1);
/// ```
#[derive(Debug)]
pub struct DispatcherMetrics {
    /// Records accepted into the intake queue
    records_submitted: AtomicU64,

    /// Batches handed over successfully
    batches_delivered: AtomicU64,

    /// Records contained in successful batches
    records_delivered: AtomicU64,

    /// Delivery attempts that failed
    delivery_failures: AtomicU64,

    /// Records lost to failed deliveries or left buffered at shutdown
    records_discarded: AtomicU64,
}

impl DispatcherMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_submitted: AtomicU64::new(0),
            batches_delivered: AtomicU64::new(0),
            records_delivered: AtomicU64::new(0),
            delivery_failures: AtomicU64::new(0),
            records_discarded: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_submitted(&self) -> u64 {
        self.records_submitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batches_delivered(&self) -> u64 {
        self.batches_delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_delivered(&self) -> u64 {
        self.records_delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_discarded(&self) -> u64 {
        self.records_discarded.load(Ordering::Relaxed)
    }

    /// Record a record accepted into the queue
    #[inline]
    pub fn record_submitted(&self) -> u64 {
        self.records_submitted.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a successful delivery of `records` records
    #[inline]
    pub fn record_delivered(&self, records: usize) {
        self.batches_delivered.fetch_add(1, Ordering::Relaxed);
        self.records_delivered
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    /// Record a failed delivery of `records` records
    #[inline]
    pub fn record_failed(&self, records: usize) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
        self.records_discarded
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    /// Record records dropped without a delivery attempt
    #[inline]
    pub fn record_discarded(&self, records: usize) {
        self.records_discarded
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    /// Failed deliveries as a percentage of all attempts (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been attempted.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.delivery_failures() as f64;
        let total = self.batches_delivered() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for DispatcherMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatcherMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_submitted: AtomicU64::new(self.records_submitted()),
            batches_delivered: AtomicU64::new(self.batches_delivered()),
            records_delivered: AtomicU64::new(self.records_delivered()),
            delivery_failures: AtomicU64::new(self.delivery_failures()),
            records_discarded: AtomicU64::new(self.records_discarded()),
        }
    }
}

//! Buffered, time-flushed hand-off of records to a delivery function
//!
//! A [`Dispatcher`] decouples the thread emitting a record from the latency of
//! delivering it. Records enter a bounded queue and a single worker thread
//! drains them into a [`Batch`]. The batch is handed to a [`Deliver`]
//! implementation when either trigger fires first:
//!
//! - **size**: after a record is appended, the batch has reached
//!   `batch_size` records (a `batch_size` of 0 flushes every record on its own)
//! - **time**: the flush interval ticked and the batch is not empty
//!
//! # Reliability
//!
//! Delivery is at-most-once. A failed delivery is reported to the error
//! callback and its batch is discarded; nothing is retried or re-queued.
//! Records still buffered when the dispatcher stops are discarded as well,
//! there is no final flush.

use super::delivery::{Batch, Deliver};
use super::diagnostics::{self, ErrorCallback};
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::metrics::DispatcherMetrics;
use super::record::Record;
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Records the intake queue holds before `submit` starts blocking.
pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

/// Flush interval used when none (or zero) is configured.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Tuning for a [`Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Capacity of the intake queue
    pub queue_capacity: usize,
    /// Records per batch; 0 delivers every record immediately
    pub batch_size: usize,
    /// Period of the time trigger; zero means [`DEFAULT_FLUSH_INTERVAL`]
    pub flush_interval: Duration,
}

impl DispatcherConfig {
    pub fn new(batch_size: usize, flush_interval: Duration) -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            batch_size,
            flush_interval,
        }
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// The interval the worker actually ticks at.
    pub fn effective_flush_interval(&self) -> Duration {
        if self.flush_interval.is_zero() {
            DEFAULT_FLUSH_INTERVAL
        } else {
            self.flush_interval
        }
    }

    /// Records to reserve up front, at most one queue's worth.
    fn initial_batch_capacity(&self) -> usize {
        self.batch_size.min(self.queue_capacity.max(1))
    }

    #[inline]
    fn batch_is_full(&self, pending: usize) -> bool {
        self.batch_size == 0 || pending >= self.batch_size
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::new(0, DEFAULT_FLUSH_INTERVAL)
    }
}

/// Lifecycle of a [`Dispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Created,
    Running,
    Stopped,
}

enum Slot {
    Created(Worker),
    Running(JoinHandle<()>),
    Stopped,
}

/// Bounded queue plus a worker thread that batches records for delivery.
///
/// # Example
///
/// ```
/// use rust_log_dispatch::core::{
///     Batch, CallSite, DeliveryError, Dispatcher, DispatcherConfig, LogLevel, Record,
/// };
/// use std::time::Duration;
///
/// let dispatcher = Dispatcher::new(
///     DispatcherConfig::new(10, Duration::from_millis(200)),
///     |batch: &Batch| -> Result<(), DeliveryError> {
///         println!("delivering {} records", batch.len());
///         Ok(())
///     },
/// );
/// dispatcher.start().unwrap();
/// dispatcher
///     .submit(Record::new(LogLevel::Info, "queued", CallSite::unknown()))
///     .unwrap();
/// dispatcher.stop();
/// ```
pub struct Dispatcher {
    sender: Sender<Record>,
    stop_tx: Sender<()>,
    stopped: Arc<AtomicBool>,
    metrics: Arc<DispatcherMetrics>,
    slot: Mutex<Slot>,
}

impl Dispatcher {
    /// Create a dispatcher in the `Created` state.
    ///
    /// Records submitted before [`start`](Self::start) wait in the queue.
    pub fn new(config: DispatcherConfig, deliver: impl Deliver) -> Self {
        let (sender, receiver) = bounded(config.queue_capacity);
        let (stop_tx, stop_rx) = bounded(1);
        let stopped = Arc::new(AtomicBool::new(false));
        let metrics = Arc::new(DispatcherMetrics::new());

        let worker = Worker {
            receiver,
            stop_rx,
            config,
            sink: BatchSink {
                deliver: Box::new(deliver),
                on_error: diagnostics::default_error_callback(),
                metrics: Arc::clone(&metrics),
                stopped: Arc::clone(&stopped),
            },
        };

        Self {
            sender,
            stop_tx,
            stopped,
            metrics,
            slot: Mutex::new(Slot::Created(worker)),
        }
    }

    /// Replace the callback that receives delivery failures.
    ///
    /// Only has an effect before the dispatcher is started.
    #[must_use]
    pub fn on_error(self, callback: ErrorCallback) -> Self {
        if let Slot::Created(worker) = &mut *self.slot.lock() {
            worker.sink.on_error = callback;
        }
        self
    }

    /// Spawn the worker thread.
    ///
    /// Starting a running dispatcher does nothing. A stopped dispatcher
    /// cannot be restarted.
    pub fn start(&self) -> Result<()> {
        let mut slot = self.slot.lock();
        match std::mem::replace(&mut *slot, Slot::Stopped) {
            Slot::Created(worker) => {
                let handle = thread::Builder::new()
                    .name("log-dispatcher".to_string())
                    .spawn(move || worker.run())?;
                *slot = Slot::Running(handle);
                tracing::debug!("log dispatcher started");
                Ok(())
            }
            running @ Slot::Running(_) => {
                *slot = running;
                Ok(())
            }
            Slot::Stopped => Err(LoggerError::LoggerStopped),
        }
    }

    /// Queue a record for delivery.
    ///
    /// Blocks while the queue is full. Callers must not submit concurrently
    /// with or after [`stop`](Self::stop); once the worker is gone this returns
    /// [`LoggerError::LoggerStopped`].
    pub fn submit(&self, record: Record) -> Result<()> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(LoggerError::LoggerStopped);
        }
        self.sender
            .send(record)
            .map_err(|_| LoggerError::LoggerStopped)?;
        self.metrics.record_submitted();
        Ok(())
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// No delivery starts once this has been called. A delivery already in
    /// flight finishes on its own. Records still buffered are discarded.
    /// Must not be called from inside the delivery function or error callback.
    pub fn stop(&self) {
        let mut slot = self.slot.lock();
        self.stopped.store(true, Ordering::Release);
        let _ = self.stop_tx.try_send(());

        match std::mem::replace(&mut *slot, Slot::Stopped) {
            Slot::Running(handle) => {
                if let Err(payload) = handle.join() {
                    diagnostics::report(
                        LogLevel::Critical,
                        format!(
                            "log dispatcher worker panicked: {}",
                            diagnostics::panic_message(payload.as_ref())
                        ),
                    );
                }
                tracing::debug!("log dispatcher stopped");
            }
            Slot::Created(worker) => {
                let pending = worker.receiver.len();
                if pending > 0 {
                    self.metrics.record_discarded(pending);
                }
            }
            Slot::Stopped => {}
        }
    }

    pub fn state(&self) -> DispatcherState {
        match &*self.slot.lock() {
            Slot::Created(_) => DispatcherState::Created,
            Slot::Running(_) => DispatcherState::Running,
            Slot::Stopped => DispatcherState::Stopped,
        }
    }

    /// Records waiting in the intake queue.
    pub fn queued(&self) -> usize {
        self.sender.len()
    }

    pub fn metrics(&self) -> &DispatcherMetrics {
        &self.metrics
    }

    /// Shared handle to the metrics, usable after the dispatcher is moved.
    pub fn metrics_handle(&self) -> Arc<DispatcherMetrics> {
        Arc::clone(&self.metrics)
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Worker {
    receiver: Receiver<Record>,
    stop_rx: Receiver<()>,
    config: DispatcherConfig,
    sink: BatchSink,
}

impl Worker {
    fn run(self) {
        let Self {
            receiver,
            stop_rx,
            config,
            mut sink,
        } = self;

        let ticker = tick(config.effective_flush_interval());
        let mut batch = Batch::with_capacity(config.initial_batch_capacity());

        loop {
            select! {
                recv(receiver) -> msg => match msg {
                    Ok(record) => {
                        batch.push(record);
                        if config.batch_is_full(batch.len()) {
                            sink.flush(&mut batch);
                        }
                    }
                    Err(_) => break,
                },
                recv(ticker) -> _ => {
                    if !batch.is_empty() {
                        sink.flush(&mut batch);
                    }
                },
                recv(stop_rx) -> _ => break,
            }

            if sink.is_stopped() {
                break;
            }
        }

        let discarded = batch.len() + receiver.len();
        if discarded > 0 {
            sink.metrics.record_discarded(discarded);
            tracing::debug!(records = discarded, "discarding undelivered records");
        }
    }
}

/// The worker's side of delivery: one attempt per batch, failures reported.
struct BatchSink {
    deliver: Box<dyn Deliver>,
    on_error: ErrorCallback,
    metrics: Arc<DispatcherMetrics>,
    stopped: Arc<AtomicBool>,
}

impl BatchSink {
    #[inline]
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    fn flush(&mut self, batch: &mut Batch) {
        // Left in place so the worker counts it as discarded on exit.
        if self.is_stopped() {
            return;
        }

        let size = batch.len();
        tracing::trace!(records = size, "flushing log batch");

        let deliver = &mut self.deliver;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| deliver.deliver(batch)));

        match outcome {
            Ok(Ok(())) => self.metrics.record_delivered(size),
            Ok(Err(e)) => {
                self.metrics.record_failed(size);
                (self.on_error)(&e);
            }
            Err(payload) => {
                self.metrics.record_failed(size);
                diagnostics::report(
                    LogLevel::Critical,
                    format!(
                        "log delivery panicked: {}",
                        diagnostics::panic_message(payload.as_ref())
                    ),
                );
            }
        }

        batch.clear();
    }
}

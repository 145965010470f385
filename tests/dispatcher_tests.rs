//! Flush trigger and shutdown tests for the dispatcher
//!
//! These tests verify:
//! - Size-triggered flushes
//! - Time-triggered flushes and quiet windows
//! - Immediate mode (batch size 0)
//! - FIFO ordering across producers
//! - Backpressure on a full queue
//! - Quiescence after stop

use parking_lot::Mutex;
use rust_log_dispatch::core::{
    Batch, CallSite, DeliveryError, Dispatcher, DispatcherConfig, LogLevel, LoggerError, Record,
};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

type Deliveries = Arc<Mutex<Vec<Vec<String>>>>;

/// Dispatcher whose deliveries are captured as lists of messages.
fn capturing(config: DispatcherConfig) -> (Dispatcher, Deliveries) {
    capturing_with_delay(config, Duration::ZERO)
}

fn capturing_with_delay(config: DispatcherConfig, delay: Duration) -> (Dispatcher, Deliveries) {
    let deliveries: Deliveries = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&deliveries);
    let dispatcher = Dispatcher::new(
        config,
        move |batch: &Batch| -> Result<(), DeliveryError> {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            sink.lock().push(
                batch
                    .records()
                    .iter()
                    .map(|r| r.message().to_string())
                    .collect(),
            );
            Ok(())
        },
    );
    dispatcher.start().expect("dispatcher starts");
    (dispatcher, deliveries)
}

fn record(message: impl Into<String>) -> Record {
    Record::new(LogLevel::Info, message, CallSite::unknown())
}

fn wait_for_deliveries(deliveries: &Deliveries, count: usize) {
    let deadline = Instant::now() + Duration::from_secs(3);
    while deliveries.lock().len() < count && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_flush_by_size() {
    let (dispatcher, deliveries) =
        capturing(DispatcherConfig::new(2, Duration::from_secs(60)));

    dispatcher.submit(record("first")).unwrap();
    dispatcher.submit(record("second")).unwrap();
    wait_for_deliveries(&deliveries, 1);

    // Give a wrongly scheduled extra flush the chance to show up
    thread::sleep(Duration::from_millis(50));
    dispatcher.stop();

    assert_eq!(*deliveries.lock(), vec![vec!["first", "second"]]);
}

#[test]
fn test_partial_batch_waits_for_size_or_time() {
    let (dispatcher, deliveries) =
        capturing(DispatcherConfig::new(3, Duration::from_secs(60)));

    dispatcher.submit(record("a")).unwrap();
    dispatcher.submit(record("b")).unwrap();
    thread::sleep(Duration::from_millis(100));
    assert!(deliveries.lock().is_empty());

    dispatcher.submit(record("c")).unwrap();
    wait_for_deliveries(&deliveries, 1);
    dispatcher.stop();

    assert_eq!(*deliveries.lock(), vec![vec!["a", "b", "c"]]);
}

#[test]
fn test_flush_by_time() {
    let (dispatcher, deliveries) =
        capturing(DispatcherConfig::new(100, Duration::from_millis(50)));

    dispatcher.submit(record("lonely")).unwrap();
    thread::sleep(Duration::from_millis(150));
    assert_eq!(*deliveries.lock(), vec![vec!["lonely"]]);

    // Ticks over an empty batch send nothing
    thread::sleep(Duration::from_millis(200));
    dispatcher.stop();

    assert_eq!(deliveries.lock().len(), 1);
    assert_eq!(dispatcher.metrics().batches_delivered(), 1);
}

#[test]
fn test_empty_window_delivers_nothing() {
    let (dispatcher, deliveries) =
        capturing(DispatcherConfig::new(100, Duration::from_millis(20)));

    thread::sleep(Duration::from_millis(150));
    dispatcher.stop();

    assert!(deliveries.lock().is_empty());
}

#[test]
fn test_unbounded_threshold_flushes_on_time() {
    let (dispatcher, deliveries) =
        capturing(DispatcherConfig::new(usize::MAX, Duration::from_millis(20)));

    dispatcher.submit(record("only")).unwrap();
    wait_for_deliveries(&deliveries, 1);
    dispatcher.stop();

    assert_eq!(*deliveries.lock(), vec![vec!["only"]]);
}

#[test]
fn test_immediate_mode() {
    let (dispatcher, deliveries) =
        capturing(DispatcherConfig::new(0, Duration::from_secs(60)));

    for i in 0..5 {
        dispatcher.submit(record(format!("r{}", i))).unwrap();
    }
    wait_for_deliveries(&deliveries, 5);
    dispatcher.stop();

    let expected: Vec<Vec<String>> = (0..5).map(|i| vec![format!("r{}", i)]).collect();
    assert_eq!(*deliveries.lock(), expected);
}

#[test]
fn test_fifo_across_producers() {
    let (dispatcher, deliveries) =
        capturing(DispatcherConfig::new(7, Duration::from_millis(20)));
    let dispatcher = Arc::new(dispatcher);

    let producers: Vec<_> = (0..3)
        .map(|p| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for i in 0..40 {
                    dispatcher.submit(record(format!("{}:{}", p, i))).unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let deadline = Instant::now() + Duration::from_secs(3);
    while dispatcher.metrics().records_delivered() < 120 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    dispatcher.stop();

    let delivered: Vec<String> = deliveries.lock().iter().flatten().cloned().collect();
    assert_eq!(delivered.len(), 120);
    for p in 0..3 {
        let prefix = format!("{}:", p);
        let own: Vec<usize> = delivered
            .iter()
            .filter_map(|m| m.strip_prefix(&prefix))
            .map(|i| i.parse().unwrap())
            .collect();
        assert_eq!(own, (0..40).collect::<Vec<_>>());
    }
}

#[test]
fn test_submit_blocks_when_queue_full() {
    let (dispatcher, deliveries) = capturing_with_delay(
        DispatcherConfig::new(0, Duration::from_secs(60)).with_queue_capacity(1),
        Duration::from_millis(100),
    );

    let started = Instant::now();
    for i in 0..4 {
        dispatcher.submit(record(format!("r{}", i))).unwrap();
    }
    let elapsed = started.elapsed();

    wait_for_deliveries(&deliveries, 4);
    dispatcher.stop();

    assert!(
        elapsed >= Duration::from_millis(150),
        "submit returned after {:?} despite a full queue",
        elapsed
    );
    assert_eq!(deliveries.lock().len(), 4);
    assert_eq!(dispatcher.metrics().records_delivered(), 4);
}

#[test]
fn test_no_delivery_after_stop() {
    let (dispatcher, deliveries) =
        capturing(DispatcherConfig::new(0, Duration::from_millis(10)));

    dispatcher.submit(record("before")).unwrap();
    wait_for_deliveries(&deliveries, 1);
    dispatcher.stop();

    let late = dispatcher.submit(record("after"));
    assert!(matches!(late, Err(LoggerError::LoggerStopped)));

    thread::sleep(Duration::from_millis(100));
    assert_eq!(*deliveries.lock(), vec![vec!["before"]]);
}

#[test]
fn test_stop_before_tick_discards_pending() {
    let (dispatcher, deliveries) =
        capturing(DispatcherConfig::new(100, Duration::from_millis(200)));

    dispatcher.submit(record("pending")).unwrap();
    thread::sleep(Duration::from_millis(20));
    dispatcher.stop();

    // A tick that would have fired after the stop delivers nothing
    thread::sleep(Duration::from_millis(300));
    assert!(deliveries.lock().is_empty());
    assert_eq!(dispatcher.metrics().records_discarded(), 1);
    assert_eq!(dispatcher.metrics().batches_delivered(), 0);
}

#[test]
fn test_stop_waits_for_inflight_delivery() {
    let (dispatcher, deliveries) = capturing_with_delay(
        DispatcherConfig::new(0, Duration::from_secs(60)),
        Duration::from_millis(150),
    );

    dispatcher.submit(record("slow")).unwrap();
    thread::sleep(Duration::from_millis(30));
    dispatcher.stop();

    // The delivery that was in flight completed; nothing started afterwards
    assert_eq!(*deliveries.lock(), vec![vec!["slow"]]);
}

#[test]
fn test_stop_from_another_thread() {
    let (dispatcher, deliveries) =
        capturing(DispatcherConfig::new(0, Duration::from_secs(60)));
    let dispatcher = Arc::new(dispatcher);

    dispatcher.submit(record("one")).unwrap();
    wait_for_deliveries(&deliveries, 1);

    let stopper = Arc::clone(&dispatcher);
    thread::spawn(move || stopper.stop()).join().unwrap();

    assert!(dispatcher.submit(record("two")).is_err());
    assert_eq!(deliveries.lock().len(), 1);
}

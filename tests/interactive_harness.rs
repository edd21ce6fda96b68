//! Interactive queue + sink integration harness.
//!
//! # What this covers
//!
//! - **Burst overflow**: with capacity 2 and three records submitted before
//!   the consumer runs, exactly one is dropped, the counter reads 1, and
//!   the two retained records render in submission order.
//! - **Non-blocking enqueue**: sustained overload never blocks a producer;
//!   the dropped counter strictly increases and no record renders twice.
//! - **FIFO**: render order matches enqueue order.
//! - **Bounded shutdown drain**: a slow surface cannot stretch shutdown
//!   past the drain deadline; leftovers are counted as dropped, never
//!   rendered late.
//! - **Fault isolation**: a failing surface skips records without
//!   affecting the producers or the rest of the run.
//!
//! # What this does NOT cover
//!
//! - Real terminal output (`ConsoleSurface` is exercised by the demo
//!   binary; harnesses use capturing surfaces)
//!
//! # Running
//!
//! ```sh
//! cargo test --test interactive_harness
//! ```

mod common;
use common::*;

use std::time::Duration;

use dray_core::Level;
use dray_sinks::{InteractiveQueue, InteractiveSink, DEFAULT_DRAIN_TIMEOUT};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Burst overflow (capacity 2, three records)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn capacity_two_burst_drops_exactly_the_newest() {
    let (queue, rx) = InteractiveQueue::bounded(2);

    // Current-thread runtime: the consumer cannot run between these calls,
    // so the burst is strictly faster than the drain.
    assert!(queue.try_enqueue(native_record(Level::Info, "first")));
    assert!(queue.try_enqueue(native_record(Level::Info, "second")));
    assert!(!queue.try_enqueue(native_record(Level::Info, "third")));
    assert_eq!(queue.dropped_count(), 1);

    let (surface, lines) = CaptureSurface::new();
    let handle = InteractiveSink::spawn(
        rx,
        Box::new(surface),
        queue.dropped(),
        CancellationToken::new(),
        DEFAULT_DRAIN_TIMEOUT,
    );
    drop(queue);

    let stats = handle.await.unwrap();
    assert_eq!(stats.rendered, 2);
    assert_eq!(*lines.lock().unwrap(), vec!["first", "second"]);
}

// ---------------------------------------------------------------------------
// Non-blocking enqueue under sustained overload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn overload_counts_monotonically_and_renders_nothing_twice() {
    const CAPACITY: usize = 8;
    const SUBMITTED: usize = 1_000;

    let (queue, rx) = InteractiveQueue::bounded(CAPACITY);

    let mut last = 0;
    for seq in 0..SUBMITTED {
        queue.try_enqueue(
            RecordBuilder::new(format!("record {seq}"))
                .level(Level::Info)
                .build(),
        );
        let now = queue.dropped_count();
        assert!(now >= last, "dropped counter went backwards");
        last = now;
    }
    assert_eq!(queue.dropped_count(), (SUBMITTED - CAPACITY) as u64);

    let (surface, lines) = CaptureSurface::new();
    let handle = InteractiveSink::spawn(
        rx,
        Box::new(surface),
        queue.dropped(),
        CancellationToken::new(),
        DEFAULT_DRAIN_TIMEOUT,
    );
    drop(queue);

    let stats = handle.await.unwrap();
    assert_eq!(stats.rendered, CAPACITY as u64);

    // Exactly the first CAPACITY records, once each, in order — nothing
    // rendered twice, nothing resurrected from the dropped tail.
    let expected: Vec<String> = (0..CAPACITY).map(|seq| format!("record {seq}")).collect();
    assert_eq!(*lines.lock().unwrap(), expected);
}

// ---------------------------------------------------------------------------
// FIFO ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn render_order_matches_enqueue_order() {
    let (queue, rx) = InteractiveQueue::bounded(64);
    for seq in 0..50 {
        assert!(queue.try_enqueue(
            RecordBuilder::new(format!("{seq}")).level(Level::Info).build()
        ));
    }

    let (surface, lines) = CaptureSurface::new();
    let handle = InteractiveSink::spawn(
        rx,
        Box::new(surface),
        queue.dropped(),
        CancellationToken::new(),
        DEFAULT_DRAIN_TIMEOUT,
    );
    drop(queue);
    handle.await.unwrap();

    let expected: Vec<String> = (0..50).map(|seq| seq.to_string()).collect();
    assert_eq!(*lines.lock().unwrap(), expected);
}

// ---------------------------------------------------------------------------
// Bounded shutdown drain
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slow_surface_cannot_stretch_the_drain_past_its_deadline() {
    const QUEUED: u64 = 10;

    let (queue, rx) = InteractiveQueue::bounded(16);
    for seq in 0..QUEUED {
        assert!(queue.try_enqueue(
            RecordBuilder::new(format!("queued {seq}")).level(Level::Info).build()
        ));
    }

    // Cancel before the consumer starts: it goes straight to the drain,
    // where each render costs 50ms against a 120ms budget.
    let stop = CancellationToken::new();
    stop.cancel();

    let (surface, _lines) = SlowSurface::new(Duration::from_millis(50));
    let handle = InteractiveSink::spawn(
        rx,
        Box::new(surface),
        queue.dropped(),
        stop,
        Duration::from_millis(120),
    );
    let stats = handle.await.unwrap();

    assert!(stats.rendered >= 1, "drain rendered nothing");
    assert!(
        stats.dropped_at_shutdown >= 1,
        "deadline never cut the drain short"
    );
    assert_eq!(stats.rendered + stats.dropped_at_shutdown, QUEUED);
    assert_eq!(queue.dropped_count(), stats.dropped_at_shutdown);
}

// ---------------------------------------------------------------------------
// Fault isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failing_surface_skips_records_and_keeps_consuming() {
    let (queue, rx) = InteractiveQueue::bounded(16);
    for seq in 0..5 {
        assert!(queue.try_enqueue(
            RecordBuilder::new(format!("doomed {seq}")).level(Level::Info).build()
        ));
    }

    let handle = InteractiveSink::spawn(
        rx,
        Box::new(FaultySurface),
        queue.dropped(),
        CancellationToken::new(),
        DEFAULT_DRAIN_TIMEOUT,
    );
    drop(queue);

    let stats = handle.await.unwrap();
    assert_eq!(stats.rendered, 0);
    assert_eq!(stats.render_failures, 5);
}

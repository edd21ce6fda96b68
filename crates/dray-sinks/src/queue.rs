//! Bounded hand-off between producers and the interactive consumer.
//!
//! Enqueue never blocks and the queue never grows past its capacity: a full
//! queue rejects the incoming record (drop-newest) and the rejection is
//! observable through the shared dropped counter, never silent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use dray_core::LogRecord;

/// Default queue capacity — generous enough to absorb bursts from many
/// concurrent producers before the console falls behind.
pub const DEFAULT_QUEUE_CAPACITY: usize = 2048;

/// Process-wide monotonic count of records that qualified for interactive
/// delivery but were discarded — on queue overflow or at shutdown. Read at
/// report time.
#[derive(Debug, Clone, Default)]
pub struct DroppedCounter(Arc<AtomicU64>);

impl DroppedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Producer side of the bounded interactive queue.
#[derive(Debug, Clone)]
pub struct InteractiveQueue {
    tx: mpsc::Sender<LogRecord>,
    dropped: DroppedCounter,
    capacity: usize,
}

impl InteractiveQueue {
    /// Create a queue of the given capacity, returning the producer handle
    /// and the consumer's receiver.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<LogRecord>) {
        let (tx, rx) = mpsc::channel(capacity);
        let queue = Self {
            tx,
            dropped: DroppedCounter::new(),
            capacity,
        };
        (queue, rx)
    }

    /// Non-blocking enqueue.
    ///
    /// A full queue (or one whose consumer is gone) discards the record,
    /// bumps the dropped counter, and returns `false`. Never an error for
    /// the caller: observability must not compromise the work being logged.
    pub fn try_enqueue(&self, record: LogRecord) -> bool {
        match self.tx.try_send(record) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                self.dropped.increment();
                false
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Handle onto the shared dropped counter.
    pub fn dropped(&self) -> DroppedCounter {
        self.dropped.clone()
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.get()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

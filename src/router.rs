//! Router — the orchestration seam between producers and sinks.
//!
//! One router handle is constructed at startup and passed (by reference or
//! `Arc`) to every producer; there is no global registry. For each record
//! the router asks the gate for destinations, writes the durable store
//! synchronously, and hands the record to the interactive queue without
//! ever blocking on it. Durability is prioritized over responsiveness: a
//! producer may block briefly on the store, never on the display.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use dray_core::{LogRecord, Origin, RoutingConfig, DEFAULT_NATIVE_PREFIX};
use dray_sinks::{
    ConsumerStats, DroppedCounter, DurableSink, InteractiveQueue, InteractiveSink, SinkError,
    Surface, DEFAULT_DRAIN_TIMEOUT, DEFAULT_QUEUE_CAPACITY,
};

/// A failure surfaced to the caller of [`Router::submit`] or
/// [`Router::shutdown`].
#[derive(Debug, Error)]
pub enum RouterError {
    /// The durable store could not be written; the record may be lost.
    #[error(transparent)]
    Durable(#[from] SinkError),
}

/// Tunables for the router. The defaults match the embedded configuration.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Namespace prefix that classifies records as native.
    pub native_prefix: String,
    /// Bounded queue capacity between producers and the console consumer.
    pub queue_capacity: usize,
    /// How long the consumer keeps draining after shutdown is signalled.
    pub drain_timeout: Duration,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            native_prefix: DEFAULT_NATIVE_PREFIX.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }
}

/// Final accounting, produced once by [`Router::shutdown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Records rendered to the interactive surface.
    pub rendered: u64,
    /// Total records dropped from interactive delivery — queue overflow
    /// plus shutdown leftovers.
    pub dropped: u64,
    /// Subset of `dropped` that was still queued when the drain deadline
    /// passed.
    pub dropped_at_shutdown: u64,
    /// Render calls that failed; those records were skipped.
    pub render_failures: u64,
}

/// The routing engine. One per process.
pub struct Router {
    config: RoutingConfig,
    native_prefix: String,
    durable: DurableSink,
    queue: InteractiveQueue,
    dropped: DroppedCounter,
    consumer: Mutex<Option<JoinHandle<ConsumerStats>>>,
    stop: CancellationToken,
    closed: AtomicBool,
    drain_timeout: Duration,
}

impl Router {
    /// Open the durable store and start the interactive consumer.
    ///
    /// Must run inside a tokio runtime; the consumer is a background task.
    pub fn start(
        config: RoutingConfig,
        store_path: impl AsRef<Path>,
        surface: Box<dyn Surface>,
        options: RouterOptions,
    ) -> Result<Self, RouterError> {
        let durable = DurableSink::open(store_path)?;
        let (queue, rx) = InteractiveQueue::bounded(options.queue_capacity);
        let dropped = queue.dropped();
        let stop = CancellationToken::new();
        let consumer = InteractiveSink::spawn(
            rx,
            surface,
            dropped.clone(),
            stop.clone(),
            options.drain_timeout,
        );
        tracing::debug!(
            file = %config.file,
            interactive = %config.interactive,
            external = %config.external,
            store = %durable.path().display(),
            "log router started"
        );
        Ok(Self {
            config,
            native_prefix: options.native_prefix,
            durable,
            queue,
            dropped,
            consumer: Mutex::new(Some(consumer)),
            stop,
            closed: AtomicBool::new(false),
            drain_timeout: options.drain_timeout,
        })
    }

    /// Route one record.
    ///
    /// Durable delivery is synchronous and a write failure reaches the
    /// caller. Interactive delivery is best-effort: a full queue bumps the
    /// dropped counter and `submit` still succeeds, and once shutdown has
    /// begun records go to the durable store only.
    pub fn submit(&self, record: LogRecord) -> Result<(), RouterError> {
        let origin = Origin::classify(&record.origin, &self.native_prefix);
        let destinations = dray_core::decide(record.level, origin, &self.config);

        if destinations.file {
            self.durable.append(&record)?;
        }
        if destinations.interactive && !self.closed.load(Ordering::Acquire) {
            self.queue.try_enqueue(record);
        }
        Ok(())
    }

    /// Records dropped from interactive delivery so far.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.get()
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Stop interactive delivery, drain the consumer, flush the store.
    ///
    /// Idempotent. Producers may keep calling [`Router::submit`]
    /// afterwards; their records reach the durable store only. A consumer
    /// panic or a surface that never returns is absorbed here — it cannot
    /// fail the shutdown, only shrink the rendered count.
    pub async fn shutdown(&self) -> Result<ShutdownReport, RouterError> {
        self.closed.store(true, Ordering::Release);
        self.stop.cancel();

        let handle = self
            .consumer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let stats = match handle {
            Some(handle) => {
                // The drain is internally bounded; the outer timeout guards
                // against a surface that never returns at all.
                let grace = self.drain_timeout + Duration::from_secs(1);
                let abort = handle.abort_handle();
                match tokio::time::timeout(grace, handle).await {
                    Ok(Ok(stats)) => stats,
                    Ok(Err(join_error)) => {
                        tracing::warn!(%join_error, "interactive consumer failed; durable delivery was unaffected");
                        ConsumerStats::default()
                    }
                    Err(_) => {
                        abort.abort();
                        tracing::warn!("interactive consumer missed the drain grace period; aborted");
                        ConsumerStats::default()
                    }
                }
            }
            None => ConsumerStats::default(),
        };

        self.durable.flush()?;

        let report = ShutdownReport {
            rendered: stats.rendered,
            dropped: self.dropped.get(),
            dropped_at_shutdown: stats.dropped_at_shutdown,
            render_failures: stats.render_failures,
        };
        tracing::info!(
            rendered = report.rendered,
            dropped = report.dropped,
            dropped_at_shutdown = report.dropped_at_shutdown,
            "log routing stopped"
        );
        Ok(report)
    }
}

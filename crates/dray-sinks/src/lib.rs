//! dray-sinks — delivery adapters for the dray log engine.
//!
//! Two terminal destinations for accepted records: the durable append-only
//! store (synchronous, ordered — the audit trail of the run) and the
//! interactive console behind a bounded queue drained by one background
//! consumer. The queue never blocks a producer; overflow is observable
//! through the shared dropped counter, never silent.

pub mod durable;
pub mod format;
pub mod interactive;
pub mod queue;

pub use durable::{DurableSink, SinkError, FLUSH_EVERY};
pub use format::{console_line, durable_line, parse_line, FormatError};
pub use interactive::{
    ConsoleSurface, ConsumerStats, InteractiveSink, Surface, DEFAULT_DRAIN_TIMEOUT,
};
pub use queue::{DroppedCounter, InteractiveQueue, DEFAULT_QUEUE_CAPACITY};

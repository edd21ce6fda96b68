//! dray — log routing and delivery for the pairsync sync tool.
//!
//! pairsync jobs run one producer task per host pair; every diagnostic
//! record they emit flows through one [`Router`] handle. The gate decides
//! per destination whether a record is kept — each destination has its own
//! severity threshold, and records from third-party dependencies are held
//! to a stricter floor on top of it. Accepted records reach an append-only
//! durable store synchronously and an interactive console asynchronously,
//! behind a bounded queue that never blocks a producer.
//!
//! # Architecture
//!
//! ```text
//! producer ──► Router ──► gate::decide
//!                 │
//!                 ├──► DurableSink        (synchronous append, arrival order)
//!                 └──► InteractiveQueue   (bounded, non-blocking)
//!                           │
//!                           ▼
//!                     InteractiveSink ──► console (async render)
//! ```
//!
//! The durable store is the audit trail: writes are ordered, flushed
//! periodically, and a failure there is a real error. The console is
//! best-effort: overflow and shutdown leftovers are counted, reported
//! once, and never block the synchronization work itself.

pub mod context;
pub mod router;

pub use context::Emitter;
pub use router::{Router, RouterError, RouterOptions, ShutdownReport};

pub use dray_core::{
    decide, Config, ConfigError, Destinations, Level, LogRecord, Origin, RoutingConfig,
    RoutingSection, UnknownLevel, DEFAULT_NATIVE_PREFIX,
};
pub use dray_sinks::{
    console_line, durable_line, parse_line, ConsoleSurface, ConsumerStats, DroppedCounter,
    DurableSink, FormatError, InteractiveQueue, InteractiveSink, SinkError, Surface,
};

//! dray-core — routing primitives for the dray log engine.
//!
//! Pure types and decision logic: the fixed level ontology, log records
//! with origin classification, validated routing configuration, and the
//! dual-threshold gate. No I/O lives here; the sinks and the router build
//! on these types from `dray-sinks` and `dray`.
//!
//! # Architecture
//!
//! ```text
//! producer ──► Router ──► gate::decide
//!                 │
//!                 ├──► durable store      (synchronous append)
//!                 └──► interactive queue  (non-blocking enqueue)
//! ```

pub mod config;
pub mod gate;
pub mod level;
pub mod record;

pub use config::{Config, ConfigError, RoutingConfig, RoutingSection};
pub use gate::{decide, Destinations};
pub use level::{Level, UnknownLevel};
pub use record::{LogRecord, Origin, DEFAULT_NATIVE_PREFIX};

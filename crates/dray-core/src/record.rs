//! Log records and origin classification.
//!
//! A [`LogRecord`] is immutable once constructed; ownership moves from the
//! producer through the router into the sinks, and no sink mutates it.
//! Origin classification is derived from the record's namespace string on
//! every decision — never cached per namespace — so it always agrees with
//! the namespace actually carried by the record.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};

use crate::level::Level;

/// Namespace prefix of the tool's own subsystems. Records whose origin is
/// this prefix or a dotted descendant of it are native; everything else is
/// a third-party dependency.
pub const DEFAULT_NATIVE_PREFIX: &str = "pairsync";

/// A single structured log record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Emission timestamp (UTC), truncated to whole microseconds.
    pub ts: DateTime<Utc>,
    /// Severity.
    pub level: Level,
    /// Hierarchical origin namespace, e.g. `pairsync.transfer.delta`.
    pub origin: String,
    /// Human-readable message.
    pub message: String,
    /// Structured fields. Values are scalars; the sorted key order keeps
    /// the durable line format stable for line-based diffing.
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl LogRecord {
    /// Build a record stamped now, with no structured fields.
    ///
    /// The timestamp is truncated to microsecond precision so a record
    /// written to the durable store parses back identical.
    pub fn new(level: Level, origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_fields(level, origin, message, BTreeMap::new())
    }

    /// Build a record stamped now, with the given structured fields.
    pub fn with_fields(
        level: Level,
        origin: impl Into<String>,
        message: impl Into<String>,
        fields: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            ts: truncate_to_micros(Utc::now()),
            level,
            origin: origin.into(),
            message: message.into(),
            fields,
        }
    }

    /// Replace the timestamp (truncating to microseconds). Intended for
    /// deterministic construction in tests and for parsers.
    pub fn at(mut self, ts: DateTime<Utc>) -> Self {
        self.ts = truncate_to_micros(ts);
        self
    }
}

/// Truncate to whole microseconds — the precision the durable format
/// stores, so equality survives a serialize/parse round trip.
fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_nanosecond(ts.nanosecond() / 1_000 * 1_000).unwrap_or(ts)
}

/// Whether a record originated inside the tool's own namespace or from a
/// third-party dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Native,
    External,
}

impl Origin {
    /// Classify a namespace against the native prefix.
    ///
    /// Native means the namespace equals the prefix or is a dotted
    /// descendant of it; `pairsyncx.foo` does not count.
    pub fn classify(namespace: &str, native_prefix: &str) -> Self {
        let descendant = namespace
            .strip_prefix(native_prefix)
            .is_some_and(|rest| rest.starts_with('.'));
        if namespace == native_prefix || descendant {
            Origin::Native
        } else {
            Origin::External
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Native => write!(f, "native"),
            Origin::External => write!(f, "external"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Test builders — ergonomic constructors for records and routing configs.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning
//! `Result`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dray_core::{Level, LogRecord, RoutingConfig};

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`LogRecord`] test fixtures.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::new("checksum mismatch")
///     .level(Level::Warning)
///     .origin("pairsync.transfer")
///     .field("block", 17)
///     .build();
/// ```
pub struct RecordBuilder {
    level: Level,
    origin: String,
    message: String,
    ts: Option<DateTime<Utc>>,
    fields: BTreeMap<String, serde_json::Value>,
}

impl RecordBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            origin: "pairsync.test".to_string(),
            message: message.into(),
            ts: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn ts(mut self, ts: DateTime<Utc>) -> Self {
        self.ts = Some(ts);
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> LogRecord {
        let record = LogRecord::with_fields(self.level, self.origin, self.message, self.fields);
        match self.ts {
            Some(ts) => record.at(ts),
            None => record,
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// A record from the tool's own namespace.
pub fn native_record(level: Level, message: &str) -> LogRecord {
    RecordBuilder::new(message)
        .level(level)
        .origin("pairsync.transfer")
        .build()
}

/// A record from a third-party dependency.
pub fn external_record(level: Level, message: &str) -> LogRecord {
    RecordBuilder::new(message)
        .level(level)
        .origin("ssh2.transport")
        .build()
}

/// Shorthand for a routing config literal.
pub fn routing(file: Level, interactive: Level, external: Level) -> RoutingConfig {
    RoutingConfig {
        file,
        interactive,
        external,
    }
}

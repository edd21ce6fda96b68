//! Record serialization — the durable line format and the console rendering.
//!
//! The durable format is one self-describing JSON object per line with a
//! fixed field order (`ts`, `level`, `origin`, `message`, `fields`) so the
//! store stays friendly to line-based tailing and diffing. [`parse_line`]
//! reconstructs an identical [`LogRecord`] from a stored line.
//!
//! The console format is for humans, not machines: fixed-width timestamp,
//! bracketed padded level name, bracketed origin, message, then `key=value`
//! pairs.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dray_core::{Level, LogRecord};

/// Wire shape of one durable line. The declaration order here is the field
/// order in the file; external tools rely on it staying put.
#[derive(Debug, Serialize, Deserialize)]
struct DurableLine {
    ts: String,
    level: String,
    origin: String,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

/// A stored line that does not parse back into a record.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("malformed durable line: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad timestamp in durable line: {0}")]
    Timestamp(#[from] chrono::ParseError),
    #[error(transparent)]
    Level(#[from] dray_core::UnknownLevel),
}

/// Serialize a record as one self-contained JSON line (no trailing newline).
///
/// Timestamps are written as RFC 3339 UTC with microsecond precision — the
/// same precision records carry in memory, so the line parses back to an
/// identical record.
pub fn durable_line(record: &LogRecord) -> Result<String, FormatError> {
    let line = DurableLine {
        ts: record.ts.to_rfc3339_opts(SecondsFormat::Micros, true),
        level: record.level.name().to_string(),
        origin: record.origin.clone(),
        message: record.message.clone(),
        fields: record.fields.clone(),
    };
    Ok(serde_json::to_string(&line)?)
}

/// Parse one durable line back into a [`LogRecord`].
pub fn parse_line(line: &str) -> Result<LogRecord, FormatError> {
    let raw: DurableLine = serde_json::from_str(line)?;
    let ts = DateTime::parse_from_rfc3339(&raw.ts)?.with_timezone(&Utc);
    let level = Level::from_name(&raw.level)?;
    Ok(LogRecord {
        ts,
        level,
        origin: raw.origin,
        message: raw.message,
        fields: raw.fields,
    })
}

/// Render the plain (uncolored) console line:
/// `HH:MM:SS.ffffff [LEVEL   ] [origin] message key=value …`
pub fn console_line(record: &LogRecord) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(64 + record.message.len());
    let _ = write!(
        out,
        "{} [{:<8}] [{}] {}",
        record.ts.format("%H:%M:%S%.6f"),
        record.level.name(),
        record.origin,
        record.message,
    );
    for (key, value) in &record.fields {
        let _ = write!(out, " {key}={}", scalar(value));
    }
    out
}

/// Console rendering of a scalar field value: strings bare, everything
/// else in its JSON form.
pub fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

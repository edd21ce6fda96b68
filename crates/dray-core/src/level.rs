//! The closed severity ontology shared by every routing decision.
//!
//! Six levels with strictly increasing values. `FULL` sits between DEBUG
//! and INFO and carries per-file transfer detail; every other level matches
//! its conventional meaning. The set is fixed at compile time — no
//! destination may be configured with a level outside it, and nothing is
//! registered or mutated after process start.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Log severity. Ordering follows the numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Debug = 10,
    Full = 15,
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

/// Compile-time name table. Keys are the canonical upper-case names;
/// [`Level::from_name`] upper-cases its input before the lookup.
static NAME_TABLE: phf::Map<&'static str, Level> = phf::phf_map! {
    "DEBUG" => Level::Debug,
    "FULL" => Level::Full,
    "INFO" => Level::Info,
    "WARNING" => Level::Warning,
    "ERROR" => Level::Error,
    "CRITICAL" => Level::Critical,
};

impl Level {
    /// Every level, ascending by severity.
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Full,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// The six valid names, ascending by severity.
    pub const NAMES: [&'static str; 6] =
        ["DEBUG", "FULL", "INFO", "WARNING", "ERROR", "CRITICAL"];

    /// Numeric value used for threshold comparison.
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Full => "FULL",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Look up a level by name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, UnknownLevel> {
        NAME_TABLE
            .get(name.to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| UnknownLevel::new(name))
    }

    /// Look up a level by its exact numeric value.
    pub fn from_value(value: u8) -> Result<Self, UnknownLevel> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.value() == value)
            .ok_or_else(|| UnknownLevel::new(value.to_string()))
    }

    /// Resolve a level name or an exact decimal value.
    ///
    /// `"WARNING"`, `"warning"`, and `"30"` all resolve to
    /// [`Level::Warning`]; anything else is an [`UnknownLevel`].
    pub fn resolve(input: &str) -> Result<Self, UnknownLevel> {
        let input = input.trim();
        if let Ok(value) = input.parse::<u8>() {
            return Self::from_value(value);
        }
        Self::from_name(input)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::resolve(s)
    }
}

/// A level name or value outside the fixed six-level set.
///
/// The display output lists the valid names so a bad configuration value is
/// diagnosable from the error alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown log level {input:?} (valid levels: DEBUG, FULL, INFO, WARNING, ERROR, CRITICAL)"
)]
pub struct UnknownLevel {
    /// The rejected input, verbatim.
    pub input: String,
}

impl UnknownLevel {
    pub fn new(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Configuration types for dray.
//!
//! [`Config::load`] reads `~/.config/pairsync/dray.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).
//!
//! Routing thresholds arrive as raw level names and pass through
//! [`RoutingSection::validate`] exactly once at startup; the resulting
//! [`RoutingConfig`] holds resolved levels and is immutable for the rest of
//! the run. A bad threshold is fatal before any producer starts.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::level::{Level, UnknownLevel};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[routing]
file        = "DEBUG"
interactive = "INFO"
external    = "WARNING"

[interactive]
queue_capacity   = 2048
drain_timeout_ms = 250

[store]
path = "pairsync.log"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/pairsync/dray.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingSection,
    #[serde(default)]
    pub interactive: InteractiveSection,
    #[serde(default)]
    pub store: StoreSection,
}

/// `[routing]` section of `dray.toml` — raw, unvalidated level names.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingSection {
    /// Threshold for the durable store.
    #[serde(default = "default_file_level")]
    pub file: String,
    /// Threshold for the interactive display.
    #[serde(default = "default_interactive_level")]
    pub interactive: String,
    /// Floor applied on top of either threshold for third-party origins.
    #[serde(default = "default_external_level")]
    pub external: String,
}

fn default_file_level() -> String {
    "DEBUG".to_string()
}
fn default_interactive_level() -> String {
    "INFO".to_string()
}
fn default_external_level() -> String {
    "WARNING".to_string()
}

impl Default for RoutingSection {
    fn default() -> Self {
        Self {
            file: default_file_level(),
            interactive: default_interactive_level(),
            external: default_external_level(),
        }
    }
}

impl RoutingSection {
    /// Resolve the three raw names against the level registry.
    ///
    /// This is the single point where configuration becomes trusted. A name
    /// (or exact numeric value) outside the fixed set fails with
    /// [`ConfigError::UnknownLevel`], which names the offending field and
    /// lists the valid levels.
    pub fn validate(&self) -> Result<RoutingConfig, ConfigError> {
        Ok(RoutingConfig {
            file: resolve_field("routing.file", &self.file)?,
            interactive: resolve_field("routing.interactive", &self.interactive)?,
            external: resolve_field("routing.external", &self.external)?,
        })
    }
}

fn resolve_field(field: &'static str, input: &str) -> Result<Level, ConfigError> {
    Level::resolve(input).map_err(|source| ConfigError::UnknownLevel { field, source })
}

/// `[interactive]` section of `dray.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractiveSection {
    /// Bounded queue capacity between producers and the console consumer.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// How long the consumer keeps draining after shutdown is signalled.
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

fn default_queue_capacity() -> usize {
    2048
}
fn default_drain_timeout_ms() -> u64 {
    250
}

impl Default for InteractiveSection {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            drain_timeout_ms: default_drain_timeout_ms(),
        }
    }
}

impl InteractiveSection {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

/// `[store]` section of `dray.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// Path of the append-only durable store.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("pairsync.log")
}

impl Default for StoreSection {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/pairsync/dray.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not
    /// exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Validated routing thresholds
// ---------------------------------------------------------------------------

/// The three resolved thresholds. Created once at startup and treated as
/// immutable process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Base threshold for the durable store.
    pub file: Level,
    /// Base threshold for the interactive display.
    pub interactive: Level,
    /// External floor: minimum severity for third-party origins.
    pub external: Level,
}

/// Configuration rejected at validation time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A threshold names a level outside the fixed set.
    #[error("invalid {field}: {source}")]
    UnknownLevel {
        field: &'static str,
        source: UnknownLevel,
    },
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("pairsync")
        .join("dray.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

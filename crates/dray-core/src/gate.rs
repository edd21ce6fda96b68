//! Gate evaluation — the pure per-record routing decision.
//!
//! Each destination has a base threshold from [`RoutingConfig`]. Records
//! from external origins are additionally held to the configured external
//! floor: the effective threshold is `max(base, external)`. The floor
//! applies on top of the destination threshold, never instead of it, so an
//! external record can never undercut the floor even when the destination
//! threshold is lower. Native records see the base threshold alone.

use crate::config::RoutingConfig;
use crate::level::Level;
use crate::record::Origin;

/// Destinations selected for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Destinations {
    /// Deliver to the durable store.
    pub file: bool,
    /// Deliver to the interactive display.
    pub interactive: bool,
}

impl Destinations {
    /// No destination selected.
    pub const fn none() -> Self {
        Self { file: false, interactive: false }
    }

    /// At least one destination selected.
    pub const fn any(self) -> bool {
        self.file || self.interactive
    }
}

/// Effective threshold for one destination.
fn effective(base: Level, origin: Origin, floor: Level) -> Level {
    match origin {
        Origin::Native => base,
        Origin::External => base.max(floor),
    }
}

/// Decide which destinations receive a record of `level` from `origin`.
pub fn decide(level: Level, origin: Origin, config: &RoutingConfig) -> Destinations {
    Destinations {
        file: level >= effective(config.file, origin, config.external),
        interactive: level >= effective(config.interactive, origin, config.external),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

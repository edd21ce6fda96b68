//! The interactive sink — a single background consumer draining the
//! bounded queue onto a render surface.
//!
//! The consumer renders in arrival order until the cancellation token
//! fires (or every producer handle is gone), then drains what is already
//! queued for a bounded timeout. Records still queued past the deadline
//! are counted as dropped-at-shutdown and never rendered — nothing appears
//! on screen after the run has logically ended.
//!
//! Rendering faults never propagate to producers: a failed render is
//! logged, the record is skipped, and the loop continues.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use dray_core::{Level, LogRecord};

use crate::format;
use crate::queue::DroppedCounter;

/// Default bound on the shutdown drain.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_millis(250);

/// A terminal destination the consumer renders records onto.
///
/// The production implementation is [`ConsoleSurface`]; tests install a
/// capturing surface.
pub trait Surface: Send {
    fn render(&mut self, record: &LogRecord) -> io::Result<()>;
}

/// Counters reported by the consumer task when it stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Records rendered to the surface, in arrival order.
    pub rendered: u64,
    /// Records still queued when the shutdown drain deadline passed.
    pub dropped_at_shutdown: u64,
    /// Render calls that failed; those records were skipped, not retried.
    pub render_failures: u64,
}

/// The background consumer. Constructed indirectly through
/// [`InteractiveSink::spawn`].
pub struct InteractiveSink;

impl InteractiveSink {
    /// Spawn the consumer task.
    ///
    /// Leftovers past the drain deadline are counted into `dropped` (the
    /// same counter the queue uses for overflow) and into the returned
    /// stats.
    pub fn spawn(
        mut rx: mpsc::Receiver<LogRecord>,
        mut surface: Box<dyn Surface>,
        dropped: DroppedCounter,
        stop: CancellationToken,
        drain_timeout: Duration,
    ) -> JoinHandle<ConsumerStats> {
        tokio::spawn(async move {
            let mut stats = ConsumerStats::default();

            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    maybe = rx.recv() => match maybe {
                        Some(record) => render_one(surface.as_mut(), &record, &mut stats),
                        // Every producer handle is gone; nothing left to drain.
                        None => return stats,
                    },
                }
            }

            // Shutdown drain. Producers stop enqueueing once shutdown
            // begins, so an empty queue ends the drain early.
            let deadline = Instant::now() + drain_timeout;
            loop {
                match rx.try_recv() {
                    Ok(record) => {
                        render_one(surface.as_mut(), &record, &mut stats);
                        if Instant::now() >= deadline {
                            let leftover = count_leftovers(&mut rx, &dropped);
                            stats.dropped_at_shutdown += leftover;
                            break;
                        }
                    }
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }
            stats
        })
    }
}

fn render_one(surface: &mut dyn Surface, record: &LogRecord, stats: &mut ConsumerStats) {
    match surface.render(record) {
        Ok(()) => stats.rendered += 1,
        Err(error) => {
            stats.render_failures += 1;
            tracing::warn!(%error, "interactive render failed, record skipped");
        }
    }
}

fn count_leftovers(rx: &mut mpsc::Receiver<LogRecord>, dropped: &DroppedCounter) -> u64 {
    let mut n = 0;
    while rx.try_recv().is_ok() {
        dropped.increment();
        n += 1;
    }
    n
}

// ---------------------------------------------------------------------------
// Console surface
// ---------------------------------------------------------------------------

/// Crossterm-styled line console on stderr.
///
/// Colors are suppressed when stderr is not a terminal, so piped output
/// stays clean.
pub struct ConsoleSurface {
    color: bool,
}

impl ConsoleSurface {
    pub fn stderr() -> Self {
        use crossterm::tty::IsTty;
        Self {
            color: io::stderr().is_tty(),
        }
    }

    /// Force colors on or off (tests, `--no-color` flags).
    pub fn with_color(color: bool) -> Self {
        Self { color }
    }
}

impl Surface for ConsoleSurface {
    fn render(&mut self, record: &LogRecord) -> io::Result<()> {
        let mut err = io::stderr().lock();
        if self.color {
            writeln!(err, "{}", styled_line(record))
        } else {
            writeln!(err, "{}", format::console_line(record))
        }
    }
}

/// Build the colored console line. Same shape as
/// [`format::console_line`], with the timestamp and fields dimmed and the
/// level name colored by severity.
fn styled_line(record: &LogRecord) -> String {
    use crossterm::style::Stylize;
    use std::fmt::Write as _;

    let ts = record.ts.format("%H:%M:%S%.6f").to_string();
    let padded = format!("{:<8}", record.level.name());
    let level = match record.level {
        Level::Critical => padded.red().bold().to_string(),
        Level::Error => padded.red().to_string(),
        Level::Warning => padded.yellow().to_string(),
        Level::Info => padded,
        Level::Full | Level::Debug => padded.dark_grey().to_string(),
    };

    let mut out = String::with_capacity(80 + record.message.len());
    let _ = write!(
        out,
        "{} [{}] [{}] {}",
        ts.dim(),
        level,
        record.origin.as_str().cyan(),
        record.message,
    );
    for (key, value) in &record.fields {
        let pair = format!("{key}={}", format::scalar(value));
        let _ = write!(out, " {}", pair.dim());
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Fake render surfaces for interactive-sink harnesses.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dray_core::LogRecord;
use dray_sinks::Surface;

/// Captures rendered messages into a shared vector, in render order.
pub struct CaptureSurface {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSurface {
    /// Returns the surface and a handle onto the captured lines.
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (Self { lines: lines.clone() }, lines)
    }
}

impl Surface for CaptureSurface {
    fn render(&mut self, record: &LogRecord) -> io::Result<()> {
        self.lines.lock().unwrap().push(record.message.clone());
        Ok(())
    }
}

/// Renders slowly — each call blocks for the configured delay. Used to
/// force the shutdown drain past its deadline.
pub struct SlowSurface {
    delay: Duration,
    lines: Arc<Mutex<Vec<String>>>,
}

impl SlowSurface {
    pub fn new(delay: Duration) -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                delay,
                lines: lines.clone(),
            },
            lines,
        )
    }
}

impl Surface for SlowSurface {
    fn render(&mut self, record: &LogRecord) -> io::Result<()> {
        std::thread::sleep(self.delay);
        self.lines.lock().unwrap().push(record.message.clone());
        Ok(())
    }
}

/// Fails every render call.
pub struct FaultySurface;

impl Surface for FaultySurface {
    fn render(&mut self, _record: &LogRecord) -> io::Result<()> {
        Err(io::Error::other("terminal went away"))
    }
}

/// Panics on the first render call, killing the consumer task.
pub struct PanicSurface;

impl Surface for PanicSurface {
    fn render(&mut self, _record: &LogRecord) -> io::Result<()> {
        panic!("render exploded");
    }
}

//! The durable sink — append-only audit trail of the run.
//!
//! Appends are serialized by a mutex around the write-and-optional-flush,
//! so concurrent callers never interleave bytes of different records and
//! arrival order is lock acquisition order. The buffered writer reaches the
//! OS every [`FLUSH_EVERY`] records; [`DurableSink::flush`] additionally
//! forces stable storage and runs at normal shutdown.
//!
//! A failed write is retried once and then escalated — this sink is the
//! authoritative record of the run, so loss is never silent.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use dray_core::LogRecord;

use crate::format::{self, FormatError};

/// Flush the buffered writer to the OS after this many appended records,
/// bounding loss on abrupt termination.
pub const FLUSH_EVERY: usize = 32;

/// A durable-store failure. Unlike interactive overflow, this is a real
/// error and reaches the caller of the router.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open durable store {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to append to durable store {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to flush durable store {path}: {source}")]
    Flush {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
}

struct Inner {
    writer: BufWriter<File>,
    since_flush: usize,
}

/// Append-only store of one self-contained JSON line per record.
pub struct DurableSink {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl DurableSink {
    /// Open (or create) the store at `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            inner: Mutex::new(Inner {
                writer: BufWriter::new(file),
                since_flush: 0,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize and append one record, retrying a failed write once.
    pub fn append(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut line = format::durable_line(record)?;
        line.push('\n');

        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Err(first) = inner.writer.write_all(line.as_bytes()) {
            tracing::warn!(error = %first, path = %self.path.display(), "durable append failed, retrying once");
            inner
                .writer
                .write_all(line.as_bytes())
                .map_err(|source| SinkError::Write {
                    path: self.path.clone(),
                    source,
                })?;
        }

        inner.since_flush += 1;
        if inner.since_flush >= FLUSH_EVERY {
            inner.since_flush = 0;
            inner.writer.flush().map_err(|source| SinkError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Flush buffered lines and force them to stable storage.
    pub fn flush(&self) -> Result<(), SinkError> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.since_flush = 0;
        inner.writer.flush().map_err(|source| SinkError::Flush {
            path: self.path.clone(),
            source,
        })?;
        inner
            .writer
            .get_ref()
            .sync_data()
            .map_err(|source| SinkError::Flush {
                path: self.path.clone(),
                source,
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dray_core::Level;

    #[test]
    fn append_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.log");
        let sink = DurableSink::open(&path).unwrap();

        for i in 0..5 {
            let record = LogRecord::new(Level::Info, "pairsync", format!("message {i}"));
            sink.append(&record).unwrap();
        }
        sink.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 5);
        for (i, line) in contents.lines().enumerate() {
            let record = format::parse_line(line).unwrap();
            assert_eq!(record.message, format!("message {i}"));
        }
    }

    #[test]
    fn open_appends_to_an_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.log");

        {
            let sink = DurableSink::open(&path).unwrap();
            sink.append(&LogRecord::new(Level::Info, "pairsync", "first run"))
                .unwrap();
            sink.flush().unwrap();
        }
        {
            let sink = DurableSink::open(&path).unwrap();
            sink.append(&LogRecord::new(Level::Info, "pairsync", "second run"))
                .unwrap();
            sink.flush().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn open_fails_on_unwritable_path() {
        let err = DurableSink::open("/definitely/not/a/dir/store.log").unwrap_err();
        assert!(matches!(err, SinkError::Open { .. }));
    }
}

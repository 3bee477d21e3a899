//! Append-only transition log
//!
//! Every record is written through a fresh handle: open (create + append),
//! one write, fsync, explicit close. No handle survives between events, so a
//! crash between events always leaves a complete, flushed file behind.

use crate::record::format_record;
use chrono::{Local, TimeZone};
use pinlog_core::{EventSink, Timestamp, TransitionEvent};
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::os::unix::io::IntoRawFd;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Log I/O failures; every one of them is fatal to monitoring
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot open log file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write to log file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot flush log file {path} to disk")]
    Sync {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot close log file {path}")]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("timestamp {0:?} has no calendar representation")]
    Timestamp(Timestamp),
}

/// Append-only log of accepted transitions
pub struct LogSink<Tz: TimeZone = Local> {
    path: PathBuf,
    tz: Tz,
    /// Records appended by this sink
    appended: u64,
}

impl LogSink<Local> {
    /// Log with local wall-clock timestamps
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_timezone(path, Local)
    }
}

impl<Tz> LogSink<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn with_timezone(path: impl Into<PathBuf>, tz: Tz) -> Self {
        Self {
            path: path.into(),
            tz,
            appended: 0,
        }
    }

    /// Append one record for `states` observed at `at`
    pub fn append(&mut self, at: Timestamp, states: &[bool]) -> Result<(), SinkError> {
        let when = at.to_datetime(&self.tz).ok_or(SinkError::Timestamp(at))?;
        let line = format_record(&when, states);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })?;

        // Whole record is formatted up front and appended in one call
        file.write_all(line.as_bytes())
            .map_err(|source| SinkError::Write {
                path: self.path.clone(),
                source,
            })?;

        file.sync_data().map_err(|source| SinkError::Sync {
            path: self.path.clone(),
            source,
        })?;

        // Dropping a File swallows close(2) errors; close explicitly instead
        nix::unistd::close(file.into_raw_fd()).map_err(|errno| SinkError::Close {
            path: self.path.clone(),
            source: io::Error::from(errno),
        })?;

        self.appended += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn appended(&self) -> u64 {
        self.appended
    }
}

impl<Tz> EventSink for LogSink<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn record(&mut self, event: &TransitionEvent, states: &[bool]) -> anyhow::Result<()> {
        self.append(event.observed_at, states)?;
        Ok(())
    }
}

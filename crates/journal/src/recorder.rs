//! Event sink combining the transition log with the console mirror

use crate::console::ConsoleMirror;
use crate::sink::LogSink;
use chrono::{Local, TimeZone};
use pinlog_core::{EventSink, TransitionEvent};
use std::fmt::Display;
use std::io::{self, Write};
use tracing::{info, warn};

/// Records each accepted transition to the log, then mirrors it
///
/// Log failures are fatal. Mirror failures are only warned about: the
/// console is a convenience, the log file is the audit record.
pub struct Recorder<Tz: TimeZone = Local, W: Write = io::Stdout> {
    log: LogSink<Tz>,
    mirror: Option<ConsoleMirror<W>>,
}

impl<Tz, W> Recorder<Tz, W>
where
    Tz: TimeZone,
    Tz::Offset: Display,
    W: Write,
{
    pub fn new(log: LogSink<Tz>, mirror: Option<ConsoleMirror<W>>) -> Self {
        Self { log, mirror }
    }

    pub fn log(&self) -> &LogSink<Tz> {
        &self.log
    }

    pub fn into_parts(self) -> (LogSink<Tz>, Option<ConsoleMirror<W>>) {
        (self.log, self.mirror)
    }
}

impl<Tz, W> EventSink for Recorder<Tz, W>
where
    Tz: TimeZone,
    Tz::Offset: Display,
    W: Write,
{
    fn record(&mut self, event: &TransitionEvent, states: &[bool]) -> anyhow::Result<()> {
        self.log.append(event.observed_at, states)?;

        info!(
            "Line {} -> {} (record #{})",
            event.line,
            u8::from(event.new_value),
            self.log.appended()
        );

        if let Some(mirror) = self.mirror.as_mut() {
            if let Err(e) = mirror.mirror(states) {
                warn!("Console mirror failed: {}", e);
            }
        }

        Ok(())
    }
}

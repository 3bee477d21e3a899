//! Log record format
//!
//! One line per accepted transition:
//!
//! ```text
//! YYYY-MM-DD,HH:MM:SS,<v0>,<v1>,...,<vN-1>\n
//! ```
//!
//! where each `<vi>` is `0` or `1` for the monitored lines in declared order.

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Render one log line, newline included
pub fn format_record<Tz>(at: &DateTime<Tz>, states: &[bool]) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut line = format!("{},{}", at.format(DATE_FORMAT), at.format(TIME_FORMAT));
    for &state in states {
        line.push(',');
        line.push(if state { '1' } else { '0' });
    }
    line.push('\n');
    line
}

/// Reasons a log line fails to parse
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("invalid date {0:?}")]
    BadDate(String),

    #[error("invalid time {0:?}")]
    BadTime(String),

    #[error("invalid level {value:?} in column {column}")]
    BadLevel { column: usize, value: String },

    #[error("record has no line levels")]
    NoLevels,
}

/// One parsed log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub states: Vec<bool>,
}

impl Record {
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let mut fields = line.trim_end_matches(['\n', '\r']).split(',');

        let date = fields.next().filter(|f| !f.is_empty()).ok_or(RecordError::MissingField("date"))?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| RecordError::BadDate(date.to_string()))?;

        let time = fields.next().ok_or(RecordError::MissingField("time"))?;
        let time = NaiveTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|_| RecordError::BadTime(time.to_string()))?;

        let states = fields
            .enumerate()
            .map(|(i, value)| match value {
                "0" => Ok(false),
                "1" => Ok(true),
                other => Err(RecordError::BadLevel {
                    column: i,
                    value: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if states.is_empty() {
            return Err(RecordError::NoLevels);
        }

        Ok(Self { date, time, states })
    }
}

impl FromStr for Record {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.date.format(DATE_FORMAT), self.time.format(TIME_FORMAT))?;
        for &state in &self.states {
            write!(f, ",{}", u8::from(state))?;
        }
        Ok(())
    }
}

/// Read every record of a log file, skipping blank lines
pub fn read_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read log file {}", path.display()))?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            Record::parse(line).with_context(|| format!("{}:{}: malformed record", path.display(), i + 1))
        })
        .collect()
}

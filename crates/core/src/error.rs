//! Error taxonomy for line bookkeeping

use crate::line::LineId;
use thiserror::Error;

/// Errors raised while wiring up or evaluating monitored lines.
///
/// All of these are fatal for a monitoring process: they indicate a broken
/// configuration or an unreadable input, never a transient condition.
#[derive(Debug, Error)]
pub enum Error {
    /// A line outside the fixed monitored set was named.
    #[error("line {0} is not in the monitored set")]
    UnknownLine(LineId),

    /// The same line was declared twice.
    #[error("line {0} is declared more than once")]
    DuplicateLine(LineId),

    /// No lines were declared at all.
    #[error("at least one line must be monitored")]
    NoLines,

    /// Configuring a line as an input failed.
    #[error("failed to configure line {line} as input")]
    Configure {
        line: LineId,
        #[source]
        source: std::io::Error,
    },

    /// Reading a line's level failed.
    #[error("failed to sample line {line}")]
    Sample {
        line: LineId,
        #[source]
        source: std::io::Error,
    },
}

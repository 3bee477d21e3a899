//! Pinlog Core - line bookkeeping primitives for the pinlog transition logger
//!
//! This crate provides the pieces every other pinlog crate builds on:
//! - Validated, ordered sets of monitored lines
//! - Millisecond time arithmetic over wall-clock timestamps
//! - The timed state store (last accepted level per line)
//! - Traits for the hardware sampler and the event sink

pub mod error;
pub mod event;
pub mod line;
pub mod sampler;
pub mod store;
pub mod time;

// Re-export main types for convenience
pub use error::Error;
pub use event::{EventSink, TransitionEvent};
pub use line::{LineId, LineSet};
pub use sampler::{EdgeCallback, EdgeSource, Sampler};
pub use store::{LineState, TimedStateStore};
pub use time::{Clock, ManualClock, SystemClock, Timestamp};

/// Common result type used throughout pinlog-core
pub type Result<T> = std::result::Result<T, Error>;

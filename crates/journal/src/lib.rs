//! Transition journal for pinlog
//!
//! This crate provides:
//! - The append-only CSV log format (write and read back)
//! - A crash-safe log sink (fresh handle per record, fsync, checked close)
//! - The console mirror
//! - `Recorder`, the event sink used by the monitoring drivers

pub mod console;
pub mod record;
pub mod recorder;
pub mod sink;

// Re-exports
pub use console::{format_mirror, ConsoleMirror};
pub use record::{format_record, read_records, Record, RecordError};
pub use recorder::Recorder;
pub use sink::{LogSink, SinkError};

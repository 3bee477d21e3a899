//! Hardware collaborator traits
//!
//! The debounce logic never touches hardware directly. It reads levels through
//! a `Sampler` and, in the edge-triggered model, learns about transitions
//! through callbacks registered on an `EdgeSource`.

use crate::line::LineId;
use std::io;

/// Instantaneous level reader for digital inputs
pub trait Sampler {
    /// Put `line` into input mode
    fn configure_input(&mut self, line: LineId) -> io::Result<()>;

    /// Read the current level of `line` (true = high)
    fn sample(&self, line: LineId) -> io::Result<bool>;
}

/// Callback invoked on a hardware edge
///
/// Takes no arguments: the notification mechanism does not say which line
/// fired, so the receiver must re-sample every line.
pub type EdgeCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Source of asynchronous edge notifications
pub trait EdgeSource {
    /// Invoke `callback` on both rising and falling edges of `line`
    ///
    /// Callbacks may run on any thread and may overlap with each other.
    fn register_edge_callback(&mut self, line: LineId, callback: EdgeCallback) -> io::Result<()>;
}

impl<S: Sampler + ?Sized> Sampler for Box<S> {
    fn configure_input(&mut self, line: LineId) -> io::Result<()> {
        (**self).configure_input(line)
    }

    fn sample(&self, line: LineId) -> io::Result<bool> {
        (**self).sample(line)
    }
}

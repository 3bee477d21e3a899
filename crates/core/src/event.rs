//! Accepted transitions and the sink that records them

use crate::line::LineId;
use crate::time::Timestamp;

/// A transition that passed the debounce check
///
/// Produced once per acceptance and consumed once by an `EventSink`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    pub line: LineId,
    pub new_value: bool,
    pub observed_at: Timestamp,
}

/// Consumer of accepted transitions
pub trait EventSink {
    /// Record `event`; `states` is the full accepted state vector (declared
    /// line order) immediately after the acceptance.
    ///
    /// Any error is fatal to the monitoring loop.
    fn record(&mut self, event: &TransitionEvent, states: &[bool]) -> anyhow::Result<()>;
}

impl<K: EventSink + ?Sized> EventSink for &mut K {
    fn record(&mut self, event: &TransitionEvent, states: &[bool]) -> anyhow::Result<()> {
        (**self).record(event, states)
    }
}

impl<K: EventSink + ?Sized> EventSink for Box<K> {
    fn record(&mut self, event: &TransitionEvent, states: &[bool]) -> anyhow::Result<()> {
        (**self).record(event, states)
    }
}

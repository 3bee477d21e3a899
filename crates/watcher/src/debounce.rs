//! Debounce engine
//!
//! Sole authority on whether an observed level change is reported. The
//! debounce window is measured from the line's last *accepted* transition,
//! never from the last raw sample, so continuous chatter around one real edge
//! cannot keep pushing the window forward.

use pinlog_core::{
    Clock, Error, EventSink, LineId, LineSet, Sampler, TimedStateStore, TransitionEvent,
};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Outcome of evaluating one line
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Sampled level equals the accepted level
    Unchanged,
    /// Level differs but the window since the last acceptance is still open
    Bounce {
        /// Time left until a differing level would be accepted
        remaining: Duration,
    },
    /// Level differs and the window has elapsed; the store now holds it
    Accepted(TransitionEvent),
}

/// Result of one pass over every monitored line
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Events handed to the sink during the pass
    pub accepted: usize,
    /// Shortest remaining window among lines suppressed as bounce
    pub next_recheck: Option<Duration>,
}

/// Debounced change detector over a fixed line set
pub struct DebounceEngine<S, C> {
    sampler: S,
    clock: C,
    store: TimedStateStore,
    window_ms: i64,
}

impl<S: Sampler, C: Clock> DebounceEngine<S, C> {
    /// Seed the state store from the current levels and build the engine
    ///
    /// Lines must already be configured as inputs.
    pub fn initialize(lines: LineSet, sampler: S, clock: C, window: Duration) -> Result<Self, Error> {
        let store = TimedStateStore::initialize(lines, &sampler, &clock)?;
        debug!(
            "Seeded {} lines (window {}ms): {:?}",
            store.lines().len(),
            window.as_millis(),
            store.values()
        );

        Ok(Self {
            sampler,
            clock,
            store,
            window_ms: i64::try_from(window.as_millis()).unwrap_or(i64::MAX),
        })
    }

    /// Evaluate a notification for `line`, emitting an event if it is genuine
    pub fn on_notify(&mut self, line: LineId) -> Result<Option<TransitionEvent>, Error> {
        match self.evaluate(line)? {
            Decision::Accepted(event) => Ok(Some(event)),
            Decision::Unchanged | Decision::Bounce { .. } => Ok(None),
        }
    }

    /// Sample `line` and decide accept / reject, updating the store on accept
    pub fn evaluate(&mut self, line: LineId) -> Result<Decision, Error> {
        // Lookup first so a misrouted line reports UnknownLine, not a sampler error
        let previous = self.store.get(line)?;
        let value = self
            .sampler
            .sample(line)
            .map_err(|source| Error::Sample { line, source })?;

        if value == previous.value {
            return Ok(Decision::Unchanged);
        }

        let now = self.clock.now();
        let elapsed_ms = now.millis_since(previous.accepted_at);

        if elapsed_ms < 0 {
            // Wall clock stepped backwards; nothing proves this is bounce
            warn!(
                "Clock moved back {}ms since line {} was last accepted",
                -elapsed_ms, line
            );
        } else if elapsed_ms < self.window_ms {
            let remaining = Duration::from_millis((self.window_ms - elapsed_ms) as u64);
            trace!(
                "Line {} bounce to {} suppressed ({}ms into window)",
                line,
                u8::from(value),
                elapsed_ms
            );
            return Ok(Decision::Bounce { remaining });
        }

        self.store.update(line, value, now)?;
        debug!("Line {} accepted {} after {}ms", line, u8::from(value), elapsed_ms);

        Ok(Decision::Accepted(TransitionEvent {
            line,
            new_value: value,
            observed_at: now,
        }))
    }

    /// Evaluate every line in declared order, recording each accepted event
    ///
    /// Simultaneous changes on several lines yield one record per line; each
    /// record carries the state vector as it stood right after that line's
    /// acceptance.
    pub fn dispatch_all<K>(&mut self, sink: &mut K) -> anyhow::Result<PassSummary>
    where
        K: EventSink + ?Sized,
    {
        let mut summary = PassSummary::default();

        for idx in 0..self.store.lines().len() {
            let line = self.store.lines().as_slice()[idx];
            match self.evaluate(line)? {
                Decision::Unchanged => {}
                Decision::Bounce { remaining } => {
                    summary.next_recheck = Some(match summary.next_recheck {
                        Some(current) => current.min(remaining),
                        None => remaining,
                    });
                }
                Decision::Accepted(event) => {
                    sink.record(&event, &self.store.values())?;
                    summary.accepted += 1;
                }
            }
        }

        Ok(summary)
    }

    pub fn store(&self) -> &TimedStateStore {
        &self.store
    }

    pub fn lines(&self) -> &LineSet {
        self.store.lines()
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms as u64)
    }
}

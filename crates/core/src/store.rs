//! Timed state store: last accepted level per monitored line

use crate::error::Error;
use crate::line::{LineId, LineSet};
use crate::sampler::Sampler;
use crate::time::{Clock, Timestamp};
use crate::Result;

/// Last level accepted as genuine for a line, and when it was accepted
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LineState {
    pub value: bool,
    pub accepted_at: Timestamp,
}

/// Per-line accepted state, one entry per monitored line
///
/// Keys are fixed at initialization and no entry is ever removed; entries
/// are stored in the line set's declared order.
#[derive(Clone, Debug)]
pub struct TimedStateStore {
    lines: LineSet,
    states: Vec<LineState>,
}

impl TimedStateStore {
    /// Seed the store by sampling every line once
    ///
    /// All entries share a single `accepted_at`, taken after the last sample,
    /// so the first genuine change on any line is measured from startup.
    pub fn initialize<S, C>(lines: LineSet, sampler: &S, clock: &C) -> Result<Self>
    where
        S: Sampler + ?Sized,
        C: Clock + ?Sized,
    {
        let mut values = Vec::with_capacity(lines.len());
        for line in lines.iter() {
            let value = sampler
                .sample(line)
                .map_err(|source| Error::Sample { line, source })?;
            values.push(value);
        }

        let now = clock.now();
        let states = values
            .into_iter()
            .map(|value| LineState { value, accepted_at: now })
            .collect();

        Ok(Self { lines, states })
    }

    /// Current accepted state of `line`
    pub fn get(&self, line: LineId) -> Result<LineState> {
        let idx = self.lines.index_of(line)?;
        Ok(self.states[idx])
    }

    /// Overwrite the accepted state of `line`
    pub fn update(&mut self, line: LineId, value: bool, at: Timestamp) -> Result<()> {
        let idx = self.lines.index_of(line)?;
        self.states[idx] = LineState { value, accepted_at: at };
        Ok(())
    }

    /// Accepted levels of every line, in declared order
    pub fn values(&self) -> Vec<bool> {
        self.states.iter().map(|s| s.value).collect()
    }

    pub fn lines(&self) -> &LineSet {
        &self.lines
    }
}

//! Polling driver
//!
//! Samples every monitored line at a fixed period and hands each pass to the
//! debounce engine. Entirely sequential: the engine and the sink are owned by
//! the single task running the loop.

use crate::debounce::{DebounceEngine, PassSummary};
use anyhow::{Context, Result};
use pinlog_core::{Clock, EventSink, Sampler};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Fixed-period polling loop
pub struct PollDriver<S, C, K> {
    engine: DebounceEngine<S, C>,
    sink: K,
    /// Poll period (default: 100ms)
    period: Duration,
}

impl<S, C, K> PollDriver<S, C, K>
where
    S: Sampler,
    C: Clock,
    K: EventSink,
{
    pub fn new(engine: DebounceEngine<S, C>, sink: K, period: Duration) -> Self {
        Self {
            engine,
            sink,
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Run one pass over every line
    pub fn tick(&mut self) -> Result<PassSummary> {
        self.engine.dispatch_all(&mut self.sink)
    }

    /// Run the polling loop
    ///
    /// Never returns except on a fatal error (sampler or sink failure).
    pub async fn run(mut self) -> Result<()> {
        let mut timer = interval(self.period);
        // A slow pass delays the schedule rather than triggering a burst
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Polling {} lines every {:?} (debounce window {:?})",
            self.engine.lines().len(),
            self.period,
            self.engine.window()
        );

        loop {
            timer.tick().await;

            let summary = self.tick().context("Polling pass failed")?;
            if summary.accepted > 0 {
                debug!("Polling pass recorded {} transitions", summary.accepted);
            }
        }
    }

    pub fn engine(&self) -> &DebounceEngine<S, C> {
        &self.engine
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}

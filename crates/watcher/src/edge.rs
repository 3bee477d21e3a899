//! Edge-triggered driver
//!
//! Edge callbacks may fire on any thread and may overlap. They never touch
//! the state store: each one only enqueues a notification. A single consumer
//! owns the engine and the sink and turns notifications into serial passes
//! over every line, since a notification does not identify the line that
//! fired.

use crate::debounce::{DebounceEngine, PassSummary};
use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use pinlog_core::{Clock, EdgeSource, EventSink, Sampler};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Cloneable handle that wakes the edge consumer
#[derive(Clone)]
pub struct EdgeNotifier {
    tx: Sender<()>,
}

impl EdgeNotifier {
    pub fn notify(&self) {
        // Unbounded and the consumer holds a sender too; cannot fail
        let _ = self.tx.send(());
    }
}

/// Why the consumer woke up
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Wake {
    Startup,
    Edge,
    Recheck,
    Rescan,
}

/// Serial consumer of edge notifications
pub struct EdgeDriver<S, C, K> {
    engine: DebounceEngine<S, C>,
    sink: K,
    tx: Sender<()>,
    rx: Receiver<()>,
    /// Periodic full pass even without edges (None = edges only)
    rescan: Option<Duration>,
}

impl<S, C, K> EdgeDriver<S, C, K>
where
    S: Sampler,
    C: Clock,
    K: EventSink,
{
    pub fn new(engine: DebounceEngine<S, C>, sink: K) -> Self {
        let (tx, rx) = unbounded();
        Self {
            engine,
            sink,
            tx,
            rx,
            rescan: None,
        }
    }

    /// Also run a full pass whenever no edge arrived for `every`
    pub fn with_rescan(mut self, every: Option<Duration>) -> Self {
        self.rescan = every.filter(|d| !d.is_zero());
        self
    }

    pub fn notifier(&self) -> EdgeNotifier {
        EdgeNotifier { tx: self.tx.clone() }
    }

    /// Register a notifying callback for every monitored line on `source`
    pub fn attach<E>(&self, source: &mut E) -> Result<()>
    where
        E: EdgeSource + ?Sized,
    {
        for line in self.engine.lines().iter() {
            let notifier = self.notifier();
            source
                .register_edge_callback(line, Box::new(move || notifier.notify()))
                .with_context(|| format!("Failed to register edge callback for line {}", line))?;
        }
        Ok(())
    }

    /// Coalesce every queued notification into one pass
    ///
    /// Returns `None` when nothing was queued.
    pub fn process_pending(&mut self) -> Result<Option<PassSummary>> {
        let mut queued = 0usize;
        while self.rx.try_recv().is_ok() {
            queued += 1;
        }

        if queued == 0 {
            return Ok(None);
        }

        trace!("Coalesced {} edge notifications", queued);
        self.pass().map(Some)
    }

    /// Run the consumer loop
    ///
    /// Starts with a full pass, so call after [`EdgeDriver::attach`].
    /// Never returns except on a fatal error (sampler or sink failure).
    pub fn run(mut self) -> Result<()> {
        info!(
            "Watching {} lines for edges (debounce window {:?}, rescan {:?})",
            self.engine.lines().len(),
            self.engine.window(),
            self.rescan
        );

        // A change between seeding and callback registration raised no
        // notification; sweep once before blocking
        let mut wake = Wake::Startup;

        loop {
            // Anything queued meanwhile is covered by the pass below
            while self.rx.try_recv().is_ok() {}

            let summary = self.pass()?;
            if summary.accepted > 0 {
                debug!("{:?} pass recorded {} transitions", wake, summary.accepted);
            }

            // A level that settles inside the window produces no further
            // edge; look again once the window has closed
            let recheck_at = summary.next_recheck.map(|remaining| Instant::now() + remaining);
            wake = self.wait(recheck_at)?;
        }
    }

    fn wait(&self, recheck_at: Option<Instant>) -> Result<Wake> {
        let now = Instant::now();
        let recheck = recheck_at.map(|at| at.saturating_duration_since(now));

        let (timeout, on_timeout) = match (recheck, self.rescan) {
            (Some(r), Some(s)) if s < r => (Some(s), Wake::Rescan),
            (Some(r), _) => (Some(r), Wake::Recheck),
            (None, Some(s)) => (Some(s), Wake::Rescan),
            (None, None) => (None, Wake::Edge),
        };

        match timeout {
            Some(timeout) => match self.rx.recv_timeout(timeout) {
                Ok(()) => Ok(Wake::Edge),
                Err(RecvTimeoutError::Timeout) => Ok(on_timeout),
                Err(RecvTimeoutError::Disconnected) => {
                    anyhow::bail!("Edge notification channel closed")
                }
            },
            None => {
                self.rx.recv().context("Edge notification channel closed")?;
                Ok(Wake::Edge)
            }
        }
    }

    fn pass(&mut self) -> Result<PassSummary> {
        self.engine
            .dispatch_all(&mut self.sink)
            .context("Edge pass failed")
    }

    pub fn engine(&self) -> &DebounceEngine<S, C> {
        &self.engine
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SimulatedPins;
    use parking_lot::Mutex;
    use pinlog_core::{LineId, LineSet, ManualClock, SystemClock, Timestamp, TransitionEvent};
    use std::sync::Arc;

    const A: LineId = LineId::new(17);
    const B: LineId = LineId::new(27);

    #[derive(Default)]
    struct Collected(Vec<(TransitionEvent, Vec<bool>)>);

    impl EventSink for Collected {
        fn record(&mut self, event: &TransitionEvent, states: &[bool]) -> anyhow::Result<()> {
            self.0.push((*event, states.to_vec()));
            Ok(())
        }
    }

    /// Records into shared storage, then fails to end the consumer loop
    struct RecordThenStop(Arc<Mutex<Vec<TransitionEvent>>>);

    impl EventSink for RecordThenStop {
        fn record(&mut self, event: &TransitionEvent, _: &[bool]) -> anyhow::Result<()> {
            self.0.lock().push(*event);
            anyhow::bail!("stop")
        }
    }

    fn manual_engine() -> (DebounceEngine<SimulatedPins, ManualClock>, SimulatedPins, ManualClock) {
        let pins = SimulatedPins::with_levels(&[(17, false), (27, false)]);
        let clock = ManualClock::new(Timestamp::from_millis(0));
        let engine = DebounceEngine::initialize(
            LineSet::new(vec![A, B]).unwrap(),
            pins.clone(),
            clock.clone(),
            Duration::from_millis(20),
        )
        .unwrap();
        (engine, pins, clock)
    }

    #[test]
    fn test_nothing_pending_without_edges() {
        let (engine, _pins, _clock) = manual_engine();
        let mut driver = EdgeDriver::new(engine, Collected::default());
        assert!(driver.process_pending().unwrap().is_none());
    }

    #[test]
    fn test_edge_on_one_line_resamples_all() {
        let (engine, mut pins, clock) = manual_engine();
        let mut driver = EdgeDriver::new(engine, Collected::default());
        driver.attach(&mut pins).unwrap();

        clock.advance(Duration::from_millis(100));
        // Only A's callback fires, but B changed without an edge reaching us
        pins.set(A, true);
        pins.set_without_edge(B, true);

        let summary = driver.process_pending().unwrap().expect("edge queued");
        assert_eq!(summary.accepted, 2);
        assert_eq!(driver.sink().0[1].1, vec![true, true]);
    }

    #[test]
    fn test_burst_of_edges_is_one_pass() {
        let (engine, mut pins, clock) = manual_engine();
        let mut driver = EdgeDriver::new(engine, Collected::default());
        driver.attach(&mut pins).unwrap();

        clock.advance(Duration::from_millis(100));
        for _ in 0..5 {
            pins.set(A, true);
            pins.set(A, false);
        }
        pins.set(A, true);

        let summary = driver.process_pending().unwrap().expect("edges queued");
        assert_eq!(summary.accepted, 1);
        assert!(driver.process_pending().unwrap().is_none());
    }

    #[test]
    fn test_settled_level_is_picked_up_by_recheck() {
        let pins = SimulatedPins::with_levels(&[(17, false), (27, false)]);
        let engine = DebounceEngine::initialize(
            LineSet::new(vec![A, B]).unwrap(),
            pins.clone(),
            SystemClock,
            Duration::from_millis(200),
        )
        .unwrap();

        let recorded = Arc::new(Mutex::new(Vec::new()));
        let driver = EdgeDriver::new(engine, RecordThenStop(Arc::clone(&recorded)));
        let mut source = pins.clone();
        driver.attach(&mut source).unwrap();

        let handle = std::thread::spawn(move || driver.run());

        // Edge arrives inside the seed window and the level then stays put:
        // no further edge will come, only the recheck can accept it
        pins.set(A, true);

        let result = handle.join().expect("consumer thread panicked");
        assert!(result.is_err());

        let events = recorded.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].line, A);
        assert!(events[0].new_value);
    }

    #[test]
    fn test_change_before_attach_is_caught_at_startup() {
        let (engine, mut pins, clock) = manual_engine();

        clock.advance(Duration::from_millis(500));
        // Raised before any callback exists, so no notification is queued
        pins.set(A, true);

        let recorded = Arc::new(Mutex::new(Vec::new()));
        let driver = EdgeDriver::new(engine, RecordThenStop(Arc::clone(&recorded)))
            .with_rescan(None);
        driver.attach(&mut pins).unwrap();

        let handle = std::thread::spawn(move || driver.run());
        assert!(handle.join().expect("consumer thread panicked").is_err());

        let events = recorded.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].line, A);
        assert!(events[0].new_value);
        assert_eq!(events[0].observed_at, Timestamp::from_millis(500));
    }

    #[test]
    fn test_rescan_without_edges() {
        let pins = SimulatedPins::with_levels(&[(17, false), (27, false)]);
        let clock = ManualClock::new(Timestamp::from_millis(0));
        let engine = DebounceEngine::initialize(
            LineSet::new(vec![A, B]).unwrap(),
            pins.clone(),
            clock.clone(),
            Duration::from_millis(20),
        )
        .unwrap();

        let recorded = Arc::new(Mutex::new(Vec::new()));
        // Never attached: only the periodic rescan can notice the change
        let driver = EdgeDriver::new(engine, RecordThenStop(Arc::clone(&recorded)))
            .with_rescan(Some(Duration::from_millis(10)));

        clock.advance(Duration::from_millis(100));
        pins.set(B, true);

        let handle = std::thread::spawn(move || driver.run());
        assert!(handle.join().expect("consumer thread panicked").is_err());
        assert_eq!(recorded.lock()[0].line, B);
    }
}

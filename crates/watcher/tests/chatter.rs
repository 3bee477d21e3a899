//! Seeded contact-bounce simulation
//!
//! Every real edge is followed by a burst of random chatter shorter than the
//! debounce window. Polling each millisecond must log each real edge exactly
//! once, with the settled level.

use pinlog_core::{EventSink, LineId, LineSet, ManualClock, Timestamp, TransitionEvent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use watcher::{DebounceEngine, PollDriver, SimulatedPins};

const WINDOW_MS: i64 = 20;
const EDGE_SPACING_MS: i64 = 100;
const MAX_BOUNCE_MS: i64 = 15;
const EDGES: i64 = 40;

#[derive(Default)]
struct Collected(Vec<(TransitionEvent, Vec<bool>)>);

impl EventSink for Collected {
    fn record(&mut self, event: &TransitionEvent, states: &[bool]) -> anyhow::Result<()> {
        self.0.push((*event, states.to_vec()));
        Ok(())
    }
}

/// Real level of a line whose edges start at `phase` ms into each period
fn real_level(t: i64, phase: i64) -> bool {
    if t < phase {
        return false;
    }
    ((t - phase) / EDGE_SPACING_MS) % 2 == 0
}

fn run_simulation(seed: u64) -> (Collected, Vec<bool>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let lines = [(LineId::new(2), 100i64), (LineId::new(3), 130i64)];

    let bounce: Vec<Vec<i64>> = lines
        .iter()
        .map(|_| (0..=EDGES).map(|_| rng.gen_range(0..=MAX_BOUNCE_MS)).collect())
        .collect();

    let pins = SimulatedPins::with_levels(&[(2, false), (3, false)]);
    let clock = ManualClock::new(Timestamp::from_millis(0));
    let engine = DebounceEngine::initialize(
        LineSet::new(lines.iter().map(|(l, _)| *l).collect()).unwrap(),
        pins.clone(),
        clock.clone(),
        Duration::from_millis(WINDOW_MS as u64),
    )
    .unwrap();
    let mut driver = PollDriver::new(engine, Collected::default(), Duration::from_millis(1));

    let end = lines[1].1 + EDGES * EDGE_SPACING_MS;
    for t in 1..end {
        for (i, &(line, phase)) in lines.iter().enumerate() {
            let mut level = real_level(t, phase);
            if t >= phase {
                let edge = ((t - phase) / EDGE_SPACING_MS) as usize;
                let offset = (t - phase) % EDGE_SPACING_MS;
                if edge < bounce[i].len() && offset < bounce[i][edge] {
                    level = rng.gen_bool(0.5);
                }
            }
            pins.set(line, level);
        }
        clock.set(Timestamp::from_millis(t));
        driver.tick().unwrap();
    }

    let finals = driver.engine().store().values();
    (Collected(driver.sink().0.clone()), finals)
}

#[test]
fn test_each_real_edge_logged_once() {
    for seed in [1u64, 7, 42, 1234] {
        let (collected, finals) = run_simulation(seed);

        for (line, phase) in [(LineId::new(2), 100i64), (LineId::new(3), 130i64)] {
            let values: Vec<bool> = collected
                .0
                .iter()
                .filter(|(e, _)| e.line == line)
                .map(|(e, _)| e.new_value)
                .collect();

            let end = 130 + EDGES * EDGE_SPACING_MS;
            let expected_edges = ((end - 1 - phase) / EDGE_SPACING_MS + 1) as usize;
            assert_eq!(values.len(), expected_edges, "seed {} line {}", seed, line);

            // Alternating levels starting with the first rising edge
            for (i, v) in values.iter().enumerate() {
                assert_eq!(*v, i % 2 == 0, "seed {} line {} edge {}", seed, line, i);
            }
        }

        let end = 130 + EDGES * EDGE_SPACING_MS - 1;
        assert_eq!(finals, vec![real_level(end, 100), real_level(end, 130)]);
    }
}

#[test]
fn test_records_carry_full_vector() {
    let (collected, _) = run_simulation(99);
    for (event, states) in &collected.0 {
        assert_eq!(states.len(), 2);
        let idx = if event.line == LineId::new(2) { 0 } else { 1 };
        assert_eq!(states[idx], event.new_value);
    }
}

//! In-memory pin bank
//!
//! Stands in for real hardware in tests, benches and dry runs. Clones share
//! the same levels and callbacks, so a test can keep one handle to drive the
//! pins while the engine owns another.

use parking_lot::Mutex;
use pinlog_core::{EdgeCallback, EdgeSource, LineId, Sampler};
use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

#[derive(Default)]
struct Bank {
    levels: BTreeMap<LineId, bool>,
    callbacks: BTreeMap<LineId, Vec<Arc<EdgeCallback>>>,
}

/// Shared simulated pin levels
#[derive(Clone, Default)]
pub struct SimulatedPins {
    bank: Arc<Mutex<Bank>>,
}

impl SimulatedPins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank with the given initial levels
    pub fn with_levels(levels: &[(u32, bool)]) -> Self {
        let pins = Self::new();
        {
            let mut bank = pins.bank.lock();
            for &(number, level) in levels {
                bank.levels.insert(LineId::new(number), level);
            }
        }
        pins
    }

    /// Drive `line` to `level`, firing its edge callbacks if the level changed
    pub fn set(&self, line: LineId, level: bool) {
        let fired: Vec<Arc<EdgeCallback>> = {
            let mut bank = self.bank.lock();
            let previous = bank.levels.insert(line, level);
            if previous == Some(level) {
                return;
            }
            bank.callbacks.get(&line).cloned().unwrap_or_default()
        };

        // Callbacks run outside the lock so they may sample freely
        for callback in fired {
            callback();
        }
    }

    /// Drive `line` to `level` without firing callbacks (a lost edge)
    pub fn set_without_edge(&self, line: LineId, level: bool) {
        self.bank.lock().levels.insert(line, level);
    }

    pub fn level(&self, line: LineId) -> Option<bool> {
        self.bank.lock().levels.get(&line).copied()
    }
}

impl Sampler for SimulatedPins {
    fn configure_input(&mut self, line: LineId) -> io::Result<()> {
        self.bank.lock().levels.entry(line).or_insert(false);
        Ok(())
    }

    fn sample(&self, line: LineId) -> io::Result<bool> {
        self.level(line).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("line {} is not configured", line),
            )
        })
    }
}

impl EdgeSource for SimulatedPins {
    fn register_edge_callback(&mut self, line: LineId, callback: EdgeCallback) -> io::Result<()> {
        self.bank
            .lock()
            .callbacks
            .entry(line)
            .or_default()
            .push(Arc::new(callback));
        Ok(())
    }
}

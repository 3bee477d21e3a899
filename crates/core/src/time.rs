//! Wall-clock timestamps with millisecond arithmetic
//!
//! A `Timestamp` carries whole seconds plus a microsecond remainder. Elapsed
//! time is always computed by folding both fields into a single millisecond
//! count before subtracting; differencing the fields separately loses the
//! sub-second part and goes wrong whenever the remainder wraps across a
//! second boundary.

use chrono::{DateTime, TimeZone};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const MICROS_PER_SEC: i64 = 1_000_000;

/// Point in wall-clock time (seconds + microseconds since the Unix epoch)
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Timestamp {
    secs: i64,
    micros: u32,
}

impl Timestamp {
    /// Build a timestamp, carrying any excess microseconds into seconds
    pub fn new(secs: i64, micros: u32) -> Self {
        let carry = i64::from(micros) / MICROS_PER_SEC;
        Self {
            secs: secs + carry,
            micros: (i64::from(micros) % MICROS_PER_SEC) as u32,
        }
    }

    pub fn from_millis(millis: i64) -> Self {
        Self::from_micros(millis * 1000)
    }

    pub fn from_micros(micros: i64) -> Self {
        Self {
            secs: micros.div_euclid(MICROS_PER_SEC),
            micros: micros.rem_euclid(MICROS_PER_SEC) as u32,
        }
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since) => Self::new(since.as_secs() as i64, since.subsec_micros()),
            Err(before) => {
                let before = before.duration();
                Self::from_micros(-(before.as_micros() as i64))
            }
        }
    }

    pub fn secs(&self) -> i64 {
        self.secs
    }

    pub fn subsec_micros(&self) -> u32 {
        self.micros
    }

    /// Both fields combined into one millisecond count
    pub fn as_millis(&self) -> i64 {
        self.secs * 1000 + i64::from(self.micros / 1000)
    }

    /// Milliseconds elapsed since `earlier` (negative if `earlier` is later)
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        self.as_millis() - earlier.as_millis()
    }

    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let total = self.secs.checked_mul(MICROS_PER_SEC)?
            .checked_add(i64::from(self.micros))?
            .checked_add(i64::try_from(duration.as_micros()).ok()?)?;
        Some(Self::from_micros(total))
    }

    /// Convert to a calendar date/time in the given zone
    ///
    /// Returns `None` only for instants outside chrono's representable range.
    /// Ambiguous local times (DST fold) resolve to the earlier reading.
    pub fn to_datetime<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_opt(self.secs, self.micros * 1000).earliest()
    }
}

/// Source of the current time
pub trait Clock: Send {
    fn now(&self) -> Timestamp;
}

/// Real wall clock
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_system_time(SystemTime::now())
    }
}

/// Manually driven clock shared between clones
///
/// Used by simulations and tests that need exact control over elapsed time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, at: Timestamp) {
        *self.now.lock() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        if let Some(next) = now.checked_add(by) {
            *now = next;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

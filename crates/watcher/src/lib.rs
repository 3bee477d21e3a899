//! Debounced GPIO transition detection for pinlog
//!
//! This crate provides:
//! - The debounce engine (per-line accept/reject against the timed state store)
//! - A fixed-period polling driver
//! - An edge-triggered driver (callbacks enqueue, one consumer evaluates)
//! - Hardware samplers (Linux sysfs GPIO, simulated pins)

pub mod debounce;
pub mod edge;
pub mod platform;
pub mod poll;

pub use debounce::{DebounceEngine, Decision, PassSummary};
pub use edge::{EdgeDriver, EdgeNotifier};
pub use platform::{configure_inputs, SimulatedPins};
pub use poll::PollDriver;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the engine is driven
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveMode {
    /// Sample every line at a fixed period
    #[default]
    Poll,
    /// Re-sample every line whenever any line reports an edge
    Edge,
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveMode::Poll => write!(f, "poll"),
            DriveMode::Edge => write!(f, "edge"),
        }
    }
}

impl FromStr for DriveMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "poll" => Ok(DriveMode::Poll),
            "edge" => Ok(DriveMode::Edge),
            other => anyhow::bail!("Unknown drive mode '{}' (expected 'poll' or 'edge')", other),
        }
    }
}

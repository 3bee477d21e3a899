//! Monitored line identifiers and the fixed line set

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one physical digital input (BCM GPIO number)
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(u32);

impl LineId {
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Raw line number as understood by the GPIO driver
    pub const fn number(&self) -> u32 {
        self.0
    }
}

impl From<u32> for LineId {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered, immutable set of monitored lines
///
/// The declared order is significant: it is the column order of every log
/// record and the order in which lines are evaluated within one pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineSet {
    lines: Vec<LineId>,
}

impl LineSet {
    /// Build a line set, rejecting empty and duplicate declarations
    pub fn new(lines: Vec<LineId>) -> crate::Result<Self> {
        if lines.is_empty() {
            return Err(Error::NoLines);
        }

        for (i, line) in lines.iter().enumerate() {
            if lines[..i].contains(line) {
                return Err(Error::DuplicateLine(*line));
            }
        }

        Ok(Self { lines })
    }

    /// Position of `line` within the declared order
    pub fn index_of(&self, line: LineId) -> crate::Result<usize> {
        self.lines
            .iter()
            .position(|l| *l == line)
            .ok_or(Error::UnknownLine(line))
    }

    pub fn contains(&self, line: LineId) -> bool {
        self.lines.contains(&line)
    }

    pub fn iter(&self) -> impl Iterator<Item = LineId> + '_ {
        self.lines.iter().copied()
    }

    pub fn as_slice(&self) -> &[LineId] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl TryFrom<Vec<u32>> for LineSet {
    type Error = Error;

    fn try_from(numbers: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(numbers.into_iter().map(LineId::new).collect())
    }
}

//! Console mirror of accepted state vectors

use std::io::{self, Write};

/// Render a state vector as `v0, v1, ...`
pub fn format_mirror(states: &[bool]) -> String {
    states
        .iter()
        .map(|&s| if s { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writes one line per accepted event, without a timestamp
pub struct ConsoleMirror<W: Write> {
    out: W,
}

impl ConsoleMirror<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleMirror<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn mirror(&mut self, states: &[bool]) -> io::Result<()> {
        writeln!(self.out, "{}", format_mirror(states))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

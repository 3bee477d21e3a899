//! Linux sysfs GPIO backend (`/sys/class/gpio`)
//!
//! Levels are read from `gpioN/value`. Edge notification uses the sysfs
//! contract: after writing `both` to `gpioN/edge`, a `poll()` on the value
//! file reports `POLLPRI` whenever the level changes, and reading the file
//! re-arms it.

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags};
use pinlog_core::{EdgeCallback, EdgeSource, LineId, Sampler};
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Default sysfs GPIO class directory
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/gpio";

/// GPIO lines exposed through sysfs
#[derive(Clone, Debug)]
pub struct SysfsGpio {
    root: PathBuf,
    /// How long to wait for udev to publish an exported line
    export_timeout: Duration,
}

impl SysfsGpio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            export_timeout: Duration::from_secs(1),
        }
    }

    pub fn with_export_timeout(mut self, timeout: Duration) -> Self {
        self.export_timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn line_dir(&self, line: LineId) -> PathBuf {
        self.root.join(format!("gpio{}", line.number()))
    }

    /// Export `line` unless it is already visible
    fn export(&self, line: LineId) -> io::Result<()> {
        let dir = self.line_dir(line);
        if dir.exists() {
            return Ok(());
        }

        fs::write(self.root.join("export"), line.number().to_string())?;

        // Attribute files show up (and get their permissions) asynchronously
        let deadline = Instant::now() + self.export_timeout;
        while !dir.join("direction").exists() {
            if Instant::now() >= deadline {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("{} did not appear after export", dir.display()),
                ));
            }
            thread::sleep(Duration::from_millis(10));
        }

        debug!("Exported GPIO {}", line);
        Ok(())
    }
}

impl Sampler for SysfsGpio {
    fn configure_input(&mut self, line: LineId) -> io::Result<()> {
        self.export(line)?;
        fs::write(self.line_dir(line).join("direction"), "in")
    }

    fn sample(&self, line: LineId) -> io::Result<bool> {
        let raw = fs::read_to_string(self.line_dir(line).join("value"))?;
        parse_level(&raw)
    }
}

impl EdgeSource for SysfsGpio {
    fn register_edge_callback(&mut self, line: LineId, callback: EdgeCallback) -> io::Result<()> {
        let dir = self.line_dir(line);
        fs::write(dir.join("edge"), "both")?;
        let value = File::open(dir.join("value"))?;

        thread::Builder::new()
            .name(format!("gpio{}-edge", line.number()))
            .spawn(move || watch_edges(value, line, callback))?;

        Ok(())
    }
}

/// Block on the value file, invoking `callback` on every edge
///
/// The thread ends only if the file becomes unreadable; the consumer's
/// rescan covers the line from then on.
fn watch_edges(value: File, line: LineId, callback: EdgeCallback) {
    let mut buf = [0u8; 8];

    loop {
        if let Err(e) = rearm(&value, &mut buf) {
            error!("Edge watcher for GPIO {} stopped: {}", line, e);
            return;
        }

        let mut fds = [PollFd::new(&value, PollFlags::POLLPRI | PollFlags::POLLERR)];
        match poll(&mut fds, -1) {
            Ok(_) => callback(),
            Err(Errno::EINTR) => continue,
            Err(e) => {
                error!("Edge watcher for GPIO {} stopped: {}", line, e);
                return;
            }
        }
    }
}

/// Read the value file from the start, clearing the pending edge
fn rearm(mut value: &File, buf: &mut [u8]) -> io::Result<()> {
    value.seek(SeekFrom::Start(0))?;
    let _ = value.read(buf)?;
    Ok(())
}

fn parse_level(raw: &str) -> io::Result<bool> {
    match raw.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unexpected GPIO value {:?}", other),
        )),
    }
}

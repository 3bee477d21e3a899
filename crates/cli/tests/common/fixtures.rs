//! Fake sysfs GPIO tree plus a config file pointing at it

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Temporary board: `gpio/` sysfs tree, `config.toml`, `transitions.csv`
pub struct FakeBoard {
    dir: TempDir,
}

impl FakeBoard {
    /// Board with the given lines at the given levels, polled every 10ms
    pub fn new(lines: &[(u32, bool)], debounce_ms: u64) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let board = Self { dir };

        fs::create_dir_all(board.sysfs_root()).unwrap();
        fs::write(board.sysfs_root().join("export"), "").unwrap();
        for &(number, level) in lines {
            let line_dir = board.sysfs_root().join(format!("gpio{}", number));
            fs::create_dir_all(&line_dir).unwrap();
            fs::write(line_dir.join("direction"), "out").unwrap();
            board.set(number, level);
        }

        let numbers: Vec<String> = lines.iter().map(|(n, _)| n.to_string()).collect();
        let config = format!(
            "[monitor]\nlines = [{}]\nmode = \"poll\"\npoll_interval_ms = 10\ndebounce_ms = {}\n\n\
             [log]\npath = {:?}\nconsole = true\n\n[gpio]\nsysfs_root = {:?}\n",
            numbers.join(", "),
            debounce_ms,
            board.log_path().display().to_string(),
            board.sysfs_root().display().to_string(),
        );
        fs::write(board.config_path(), config).unwrap();

        board
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn sysfs_root(&self) -> PathBuf {
        self.dir.path().join("gpio")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn config_arg(&self) -> String {
        self.config_path().display().to_string()
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("transitions.csv")
    }

    /// Drive a line's value file
    pub fn set(&self, number: u32, level: bool) {
        let value = self.sysfs_root().join(format!("gpio{}/value", number));
        fs::write(value, if level { "1\n" } else { "0\n" }).unwrap();
    }

    /// Log contents once it holds at least `count` lines, or whatever is
    /// there when `timeout` expires
    pub fn wait_for_records(&self, count: usize, timeout: Duration) -> String {
        let deadline = Instant::now() + timeout;
        loop {
            let contents = fs::read_to_string(self.log_path()).unwrap_or_default();
            if contents.lines().count() >= count || Instant::now() >= deadline {
                return contents;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
    }
}

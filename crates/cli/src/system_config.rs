//! Pinlog configuration file
//!
//! Loaded once at startup from `<config_dir>/pinlog/config.toml` (or the
//! path given with `--config`). A missing default file means built-in
//! defaults; any invalid value is a fatal configuration error.

use anyhow::{Context, Result};
use pinlog_core::LineSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use watcher::platform::DEFAULT_SYSFS_ROOT;
use watcher::DriveMode;

/// Full pinlog configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinlogConfig {
    pub monitor: MonitorConfig,
    pub log: LogConfig,
    pub gpio: GpioConfig,
}

/// `[monitor]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Monitored GPIO numbers, in log column order
    pub lines: Vec<u32>,
    pub mode: DriveMode,
    /// Polling period (poll mode only)
    pub poll_interval_ms: u64,
    /// Debounce window
    pub debounce_ms: u64,
    /// Full pass without edges after this long (edge mode only, 0 = never)
    pub edge_rescan_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            lines: vec![2, 3, 4],
            mode: DriveMode::Poll,
            poll_interval_ms: 100,
            debounce_ms: 20,
            edge_rescan_ms: 1000,
        }
    }
}

/// `[log]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Transition log file (created if absent, only ever appended)
    pub path: PathBuf,
    /// Mirror each accepted state vector to stdout
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("pinlog.csv"),
            console: true,
        }
    }
}

/// `[gpio]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GpioConfig {
    pub sysfs_root: PathBuf,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
        }
    }
}

impl PinlogConfig {
    /// Check every value against its valid range
    pub fn validate(&self) -> Result<()> {
        self.line_set()?;

        let m = &self.monitor;
        if !(1..=60_000).contains(&m.poll_interval_ms) {
            anyhow::bail!("monitor.poll_interval_ms must be 1-60000 (got {})", m.poll_interval_ms);
        }
        if !(1..=10_000).contains(&m.debounce_ms) {
            anyhow::bail!("monitor.debounce_ms must be 1-10000 (got {})", m.debounce_ms);
        }
        if m.edge_rescan_ms != 0 && !(10..=3_600_000).contains(&m.edge_rescan_ms) {
            anyhow::bail!(
                "monitor.edge_rescan_ms must be 0 or 10-3600000 (got {})",
                m.edge_rescan_ms
            );
        }
        if self.log.path.as_os_str().is_empty() {
            anyhow::bail!("log.path must not be empty");
        }

        Ok(())
    }

    /// The monitored lines as a validated set
    pub fn line_set(&self) -> Result<LineSet> {
        LineSet::try_from(self.monitor.lines.clone()).context("Invalid monitor.lines")
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.poll_interval_ms)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.monitor.debounce_ms)
    }

    pub fn edge_rescan(&self) -> Option<Duration> {
        match self.monitor.edge_rescan_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Read a single value by dotted key
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "monitor.lines" => self
                .monitor
                .lines
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(","),
            "monitor.mode" => self.monitor.mode.to_string(),
            "monitor.poll_interval_ms" => self.monitor.poll_interval_ms.to_string(),
            "monitor.debounce_ms" => self.monitor.debounce_ms.to_string(),
            "monitor.edge_rescan_ms" => self.monitor.edge_rescan_ms.to_string(),
            "log.path" => self.log.path.display().to_string(),
            "log.console" => self.log.console.to_string(),
            "gpio.sysfs_root" => self.gpio.sysfs_root.display().to_string(),
            _ => anyhow::bail!(
                "Unknown config key: {}. Use 'pinlog config list' to see available keys.",
                key
            ),
        };
        Ok(value)
    }

    /// Set a single value by dotted key, then validate the result
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "monitor.lines" => {
                self.monitor.lines = value
                    .split(',')
                    .map(|n| n.trim().parse::<u32>())
                    .collect::<Result<Vec<u32>, _>>()
                    .context("Invalid value: must be a comma-separated list of GPIO numbers")?;
            }
            "monitor.mode" => {
                self.monitor.mode = value.parse()?;
            }
            "monitor.poll_interval_ms" => {
                self.monitor.poll_interval_ms = value
                    .parse()
                    .context("Invalid value: must be a positive integer")?;
            }
            "monitor.debounce_ms" => {
                self.monitor.debounce_ms = value
                    .parse()
                    .context("Invalid value: must be a positive integer")?;
            }
            "monitor.edge_rescan_ms" => {
                self.monitor.edge_rescan_ms = value
                    .parse()
                    .context("Invalid value: must be a non-negative integer")?;
            }
            "log.path" => {
                self.log.path = PathBuf::from(value);
            }
            "log.console" => {
                self.log.console = value
                    .parse()
                    .context("Invalid value: must be 'true' or 'false'")?;
            }
            "gpio.sysfs_root" => {
                self.gpio.sysfs_root = PathBuf::from(value);
            }
            _ => anyhow::bail!(
                "Unknown config key: {}. Use 'pinlog config list' to see available keys.",
                key
            ),
        }

        self.validate().context("Invalid configuration value")
    }
}

/// Default config file location
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pinlog").join("config.toml"))
}

/// Load and validate the configuration
///
/// An explicit `path` must exist. Without one, the default location is used
/// if present, otherwise built-in defaults.
pub fn load(path: Option<&Path>) -> Result<PinlogConfig> {
    let config = match path {
        Some(path) => load_file(path)?,
        None => match config_file_path() {
            Some(default) if default.exists() => load_file(&default)?,
            _ => {
                tracing::debug!("No config file found, using defaults");
                PinlogConfig::default()
            }
        },
    };

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn load_file(path: &Path) -> Result<PinlogConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Write the configuration to `path`, creating parent directories
pub fn save(config: &PinlogConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config file {}", path.display()))
}

/// Create the config file with defaults unless it already exists
pub fn init_if_missing(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, example_config())
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(true)
}

/// Annotated configuration with every default spelled out
pub fn example_config() -> &'static str {
    r#"# pinlog configuration

[monitor]
# GPIO numbers to watch; this order is the column order of the log
lines = [2, 3, 4]
# "poll" samples every line each poll_interval_ms;
# "edge" re-samples every line whenever any line reports an edge
mode = "poll"
poll_interval_ms = 100
# Changes within this many ms of the last accepted change are bounce
debounce_ms = 20
# Edge mode: full pass after this long without edges (0 = never)
edge_rescan_ms = 1000

[log]
path = "pinlog.csv"
console = true

[gpio]
sysfs_root = "/sys/class/gpio"
"#
}

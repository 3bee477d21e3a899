//! Monitor the configured lines until interrupted or a fatal error

use anyhow::{Context, Result};
use cli_lib::{monitor, system_config};
use pinlog_core::SystemClock;
use std::path::Path;
use tracing::{error, info};
use watcher::platform::SysfsGpio;
use watcher::{configure_inputs, DriveMode};

pub async fn run(config_path: Option<&Path>, mode: Option<DriveMode>) -> Result<()> {
    let mut config = system_config::load(config_path)?;
    if let Some(mode) = mode {
        config.monitor.mode = mode;
    }

    let lines = config.line_set()?;
    let mut gpio = SysfsGpio::new(&config.gpio.sysfs_root);
    configure_inputs(&mut gpio, &lines).context("Failed to configure GPIO inputs")?;

    info!(
        "Starting pinlog ({} mode, {} lines)",
        config.monitor.mode,
        lines.len()
    );

    tokio::select! {
        result = monitor::run(&config, lines, gpio, SystemClock) => {
            if let Err(e) = &result {
                error!("Monitoring stopped: {:#}", e);
            }
            result
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted, stopping");
            Ok(())
        }
    }
}

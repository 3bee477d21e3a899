//! Sample every configured line once

use anyhow::{Context, Result};
use cli_lib::system_config;
use journal::format_mirror;
use owo_colors::OwoColorize;
use pinlog_core::Sampler;
use std::path::Path;
use watcher::configure_inputs;
use watcher::platform::SysfsGpio;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = system_config::load(config_path)?;
    let lines = config.line_set()?;

    let mut gpio = SysfsGpio::new(&config.gpio.sysfs_root);
    configure_inputs(&mut gpio, &lines).context("Failed to configure GPIO inputs")?;

    let mut levels = Vec::with_capacity(lines.len());
    for line in lines.iter() {
        let level = gpio
            .sample(line)
            .with_context(|| format!("Failed to sample GPIO {}", line))?;
        levels.push(level);

        let shown = if level { "1 (high)".green().to_string() } else { "0 (low)".dimmed().to_string() };
        println!("  GPIO {} {}", format!("{:<3}", line).cyan(), shown);
    }

    println!("{}", format_mirror(&levels));
    Ok(())
}

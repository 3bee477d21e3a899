//! Configuration management command
//!
//! Provides CLI interface to view and edit the pinlog configuration.

use anyhow::{Context, Result};
use cli_lib::system_config;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Explicit `--config` path, else the default location
fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => system_config::config_file_path().context("Could not determine config file path"),
    }
}

/// List all configuration values
pub async fn run_list(config_path: Option<&Path>) -> Result<()> {
    let config = system_config::load(config_path)?;
    let path = resolve_path(config_path)?;

    println!("{}", "Pinlog Configuration".bold());
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not present, using defaults)", path.display())
    };
    println!("{}: {}\n", "Location".dimmed(), source.dimmed());

    println!("{}", "[monitor]".yellow());
    for key in ["lines", "mode", "poll_interval_ms", "debounce_ms", "edge_rescan_ms"] {
        let value = config.get(&format!("monitor.{}", key))?;
        println!("  {} = {}", key.cyan(), value);
    }

    println!("\n{}", "[log]".yellow());
    for key in ["path", "console"] {
        let value = config.get(&format!("log.{}", key))?;
        println!("  {} = {}", key.cyan(), value);
    }

    println!("\n{}", "[gpio]".yellow());
    println!("  {} = {}", "sysfs_root".cyan(), config.get("gpio.sysfs_root")?);

    println!("\n{}", "Valid Ranges:".bold());
    println!("  lines: one or more distinct GPIO numbers");
    println!("  mode: poll | edge");
    println!("  poll_interval_ms: 1-60,000");
    println!("  debounce_ms: 1-10,000");
    println!("  edge_rescan_ms: 10-3,600,000 (0 = never)");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(config_path: Option<&Path>, key: &str) -> Result<()> {
    let config = system_config::load(config_path)?;
    println!("{}", config.get(key)?);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(config_path: Option<&Path>, key: &str, value: &str) -> Result<()> {
    let path = resolve_path(config_path)?;
    let mut config = if path.exists() {
        system_config::load(Some(path.as_path()))?
    } else {
        system_config::PinlogConfig::default()
    };

    config.set(key, value)?;
    system_config::save(&config, &path)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    println!(
        "{}",
        "Note: restart pinlog for changes to take effect".yellow()
    );

    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(config_path: Option<&Path>, create: bool) -> Result<()> {
    let path = resolve_path(config_path)?;

    if create && !path.exists() {
        system_config::init_if_missing(&path)?;
        println!("{} Created config file at: {}", "✓".green(), path.display());
    } else if path.exists() {
        println!("{}", path.display());
    } else {
        println!("{}", path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    print!("{}", system_config::example_config());
    Ok(())
}

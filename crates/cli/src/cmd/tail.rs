//! Show the most recent transition records

use anyhow::Result;
use cli_lib::system_config;
use journal::read_records;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, count: usize) -> Result<()> {
    let config = system_config::load(config_path)?;
    let path = &config.log.path;

    if !path.exists() {
        println!("{}", format!("No transitions logged yet ({})", path.display()).yellow());
        return Ok(());
    }

    let records = read_records(path)?;
    let start = records.len().saturating_sub(count);

    println!(
        "{} {}",
        "date       time     ".bold(),
        config
            .monitor
            .lines
            .iter()
            .map(|n| format!("{:>3}", n))
            .collect::<Vec<_>>()
            .join("")
            .bold()
    );

    for record in &records[start..] {
        let levels: String = record
            .states
            .iter()
            .map(|&s| if s { format!("  {}", "1".green()) } else { format!("  {}", "0".dimmed()) })
            .collect();
        println!(
            "{} {} {}",
            record.date.format("%Y-%m-%d"),
            record.time.format("%H:%M:%S"),
            levels
        );
    }

    println!(
        "{}",
        format!("{} of {} records from {}", records.len() - start, records.len(), path.display()).dimmed()
    );
    Ok(())
}

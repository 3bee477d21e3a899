//! Pinlog CLI - pinlog command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use watcher::DriveMode;

mod cmd;

/// Pinlog - debounced GPIO transition logger
#[derive(Parser)]
#[command(name = "pinlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/pinlog/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write diagnostics to a daily-rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// More diagnostics (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Monitor the configured lines and log every debounced transition
    Run {
        /// Override the configured drive mode (poll or edge)
        #[arg(long)]
        mode: Option<DriveMode>,
    },
    /// Sample every configured line once
    Read,
    /// Show the most recent logged transitions
    Tail {
        /// Number of records to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
    /// View or edit the configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Print a single value (e.g. monitor.debounce_ms)
    Get {
        key: String,
    },
    /// Change a single value
    Set {
        key: String,
        value: String,
    },
    /// Show the config file location
    Path {
        /// Create the file with defaults if it does not exist
        #[arg(long)]
        create: bool,
    },
    /// Print an annotated example configuration
    Example,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Held for the whole run so the file writer flushes on exit
    let _log_guard = cli_lib::logging::init(cli.verbose, cli.log_dir.as_deref())?;

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Run { mode } => cmd::run::run(config, mode).await,
        Commands::Read => cmd::read::run(config).await,
        Commands::Tail { count } => cmd::tail::run(config, count).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list(config).await,
            ConfigCommands::Get { key } => cmd::config::run_get(config, &key).await,
            ConfigCommands::Set { key, value } => cmd::config::run_set(config, &key, &value).await,
            ConfigCommands::Path { create } => cmd::config::run_path(config, create).await,
            ConfigCommands::Example => cmd::config::run_example().await,
        },
    }
}

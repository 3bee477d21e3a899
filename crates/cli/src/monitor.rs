//! Wires the configured sampler, engine, drivers and recorder together

use crate::system_config::PinlogConfig;
use anyhow::{Context, Result};
use journal::{format_mirror, ConsoleMirror, LogSink, Recorder};
use pinlog_core::{Clock, EdgeSource, LineSet, Sampler};
use tokio::sync::oneshot;
use tracing::info;
use watcher::{DebounceEngine, DriveMode, EdgeDriver, PollDriver};

/// Recorder for the configured log file and console setting
pub fn build_recorder(config: &PinlogConfig) -> Recorder {
    let mirror = config.log.console.then(ConsoleMirror::stdout);
    Recorder::new(LogSink::new(&config.log.path), mirror)
}

/// Seed the state store and monitor until a fatal error
///
/// `sampler` must already have every line configured as an input. In edge
/// mode a clone of it is used to register the edge callbacks.
pub async fn run<S, C>(config: &PinlogConfig, lines: LineSet, sampler: S, clock: C) -> Result<()>
where
    S: Sampler + EdgeSource + Clone + Send + 'static,
    C: Clock + 'static,
{
    let mut edge_source = sampler.clone();
    let engine = DebounceEngine::initialize(lines, sampler, clock, config.debounce_window())
        .context("Failed to read initial line levels")?;

    info!(
        "Initial levels [{}]: {}",
        engine
            .lines()
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        format_mirror(&engine.store().values())
    );
    info!("Logging transitions to {}", config.log.path.display());

    let recorder = build_recorder(config);

    match config.monitor.mode {
        DriveMode::Poll => {
            PollDriver::new(engine, recorder, config.poll_interval())
                .run()
                .await
        }
        DriveMode::Edge => {
            let driver = EdgeDriver::new(engine, recorder).with_rescan(config.edge_rescan());
            driver.attach(&mut edge_source)?;
            run_edge_consumer(driver).await
        }
    }
}

/// Run the edge consumer on its own thread and wait for it to fail
///
/// A plain thread rather than a blocking task: the consumer never returns
/// on its own, and the runtime must not wait for it at shutdown.
async fn run_edge_consumer<S, C>(driver: EdgeDriver<S, C, Recorder>) -> Result<()>
where
    S: Sampler + Send + 'static,
    C: Clock + 'static,
{
    let (done_tx, done_rx) = oneshot::channel();

    std::thread::Builder::new()
        .name("edge-consumer".to_string())
        .spawn(move || {
            let _ = done_tx.send(driver.run());
        })
        .context("Failed to start edge consumer thread")?;

    done_rx
        .await
        .context("Edge consumer thread exited without a result")?
}

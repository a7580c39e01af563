// SASEUL Pool Miner - Free and Open Source Software Statement
//
// File: src/main.rs
// Version: 1.0.0
//
// Binary entry point: parse arguments, set up logging and signal handling,
// then run the pool supervisor until SIGINT or SIGTERM.

use anyhow::Context;
use clap::Parser;
use log::info;
use saseul_pool_miner::{Args, Shutdown, Supervisor, utils::logging::init_logging};
use tokio::signal::unix::{SignalKind, signal};

const LOG_TARGET: &str = "saseul::pool_miner::main";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(err) = args.validate() {
        eprintln!("❌ Error: {}", err);
        std::process::exit(1);
    }

    init_logging(args.log_config.as_deref())?;

    let config = args.into_config().map_err(anyhow::Error::msg)?;
    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone())?;

    let supervisor = Supervisor::new(config, shutdown).context("Invalid status file path")?;
    supervisor.run().await;
    Ok(())
}

fn spawn_signal_handler(shutdown: Shutdown) -> anyhow::Result<()> {
    let mut sigint = signal(SignalKind::interrupt()).context("Cannot install SIGINT handler")?;
    let mut sigterm = signal(SignalKind::terminate()).context("Cannot install SIGTERM handler")?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
        info!(target: LOG_TARGET, "Shutdown signal received");
        shutdown.trigger();
    });
    Ok(())
}

// Changelog:
// - v1.0.0: Pool miner entry point with SIGINT/SIGTERM shutdown.

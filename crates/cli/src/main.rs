//! sizewatch entry point.
//!
//! Binds one target from the command line, runs the check once, or forever
//! with a fixed sleep when endless mode is configured. Logging goes to the
//! configured append-only file.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sizewatch_core::AppConfig;

mod cli;
mod logging;
mod runner;

use cli::Args;
use runner::Runner;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load().context("loading configuration")?;

    logging::init(&config.log_path)?;

    if !config.notifications_enabled() {
        tracing::warn!("no notification transport enabled; changes will only be logged");
    }

    let runner = match args.target().map_err(anyhow::Error::from).and_then(|t| Runner::from_config(t, &config)) {
        Ok(runner) => Arc::new(runner),
        Err(e) => {
            tracing::error!("startup failed: {e:#}");
            return Err(e);
        }
    };

    let target = runner.target();
    tracing::debug!(
        url = %target.url,
        cache = %target.cache_path.display(),
        size = %target.size,
        transports = ?runner.notifier().transport_names(),
        endless = config.endless,
        "watching {}",
        target.label
    );

    runner::run_loop(runner, config.endless, config.poll_interval(), None).await;

    Ok(())
}

//! Logging setup: console on stderr plus an optional log file

use crate::config::SolverConfig;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` if set, otherwise the configured level
pub fn env_filter(log_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("Invalid log level: {}", log_level)),
    }
}

/// Build the subscriber described by the solver settings
pub fn build_subscriber(
    config: &SolverConfig,
    filter: EnvFilter,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    let console = config
        .log_to_console
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));

    let file = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file))
}

/// Install the global subscriber
pub fn init_logging(config: &SolverConfig) -> Result<()> {
    let filter = env_filter(&config.log_level)?;
    build_subscriber(config, filter)?
        .try_init()
        .context("Failed to initialise logging")
}

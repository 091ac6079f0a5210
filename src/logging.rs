// src/logging.rs
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogConfig;

/// Log through `tracing` with the level as the first token:
/// `app_log!(info, "Fetched {} jobs", n)`.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

/// Install the global subscriber.
///
/// With a log file configured, records go there as JSON (truncated on
/// startup); otherwise a compact human format goes to stderr so stdout stays
/// clean for command output.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.directive))
        .context("Invalid log directive")?;

    match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(file)
                        .with_current_span(false)
                        .with_span_list(false),
                )
                .with(filter)
                .try_init()
                .context("Failed to install log subscriber")?;
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .with(filter)
                .try_init()
                .context("Failed to install log subscriber")?;
        }
    }

    Ok(())
}

//! Logging: the injectable sink used by the coordinator, and subscriber
//! setup for the binary.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

/// Destination for `(level, message)` records.
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards records to the global `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        if level == Level::ERROR {
            tracing::error!("{}", message);
        } else if level == Level::WARN {
            tracing::warn!("{}", message);
        } else if level == Level::INFO {
            tracing::info!("{}", message);
        } else if level == Level::DEBUG {
            tracing::debug!("{}", message);
        } else {
            tracing::trace!("{}", message);
        }
    }
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Installs the global subscriber: everything `RUST_LOG` allows (default
/// `info`, or `debug` when verbose) goes to `log_path`; warnings and errors
/// are echoed to stderr. Nothing is written to stdout.
pub fn init_logging(log_path: &Path, verbose: bool) -> Result<(), LoggingError> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(env_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(LevelFilter::WARN),
        )
        .try_init()?;

    Ok(())
}

//! Logging setup
//!
//! Installs the global `tracing` subscriber: human-readable or JSON lines on
//! stderr, filtered by `RUST_LOG` when set and by the configured level
//! otherwise. Stdout stays free for command output.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::models::settings::LogFormat;

/// Filter from `RUST_LOG`, falling back to `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(format: LogFormat, default_level: &str) -> Result<(), TryInitError> {
    let filter = env_filter(default_level);
    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .try_init(),
    }
}

//! Logging setup for the command line runner.
//!
//! Installs a global tracing subscriber writing to stderr so that reports on
//! stdout stay clean. The filter comes from `RUST_LOG`, falling back to the
//! given default directive.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The fallback filter directive could not be parsed.
    #[error("Invalid log filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// Another global subscriber was already installed.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing_subscriber::util::TryInitError),
}

/// Initialize tracing with an `info` default level.
///
/// Subsequent calls are no-ops.
pub fn init() -> Result<(), LoggingError> {
    init_with_default("info")
}

pub fn init_with_default(default_directive: &str) -> Result<(), LoggingError> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;

    let _ = INITIALIZED.set(());
    Ok(())
}

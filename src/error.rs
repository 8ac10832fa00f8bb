//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::net::ListenerError;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("listener: {0}")]
    Listener(#[from] ListenerError),
    #[error("logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

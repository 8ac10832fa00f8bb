//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::Deserialize;

/// Root configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Static file directory used by the `/files/` routes.
    pub files: FilesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request parser selection.
    pub parser: ParserConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:4221").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:4221".to_string(),
            max_connections: 1024,
        }
    }
}

/// Base directory for file reads and writes.
///
/// An empty directory means paths resolve against the working directory.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FilesConfig {
    pub directory: String,
}

/// Timeout configuration for connection handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Seconds a connection may take to deliver a complete request.
    /// Zero disables the timeout.
    pub idle_secs: u64,

    /// Seconds to wait for in-flight connections after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            idle_secs: 30,
            shutdown_grace_secs: 5,
        }
    }
}

/// Request parser configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ParserConfig {
    /// Wait for `Content-Length` body bytes instead of completing at the
    /// end of the header block.
    pub await_content_length: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

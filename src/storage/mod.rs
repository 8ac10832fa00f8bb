//! Storage subsystem.
//!
//! # Data Flow
//! ```text
//! /files/<name> request
//!     → files.rs (resolve <name> under the base directory)
//!     → tokio::fs (exists / read / write)
//!     → StorageError mapped to a status by the handler
//! ```
//!
//! # Design Decisions
//! - Non-existence is its own error kind; everything else is Io
//! - No path traversal checks: `..` segments are passed through

pub mod files;

pub use files::{FileStore, StorageError};

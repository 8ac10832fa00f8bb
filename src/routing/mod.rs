//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Parsed Request (method, target)
//!     → router.rs (ordered route scan)
//!     → matcher.rs (evaluate method + path conditions)
//!     → Return: Endpoint (NotFound when nothing matched)
//!
//! Route table (at startup):
//!     GET  /          exact   → root
//!     GET  /echo/     prefix  → echo
//!     GET  /user-agent prefix → user-agent
//!     GET  /files/    prefix  → file-read
//!     POST /files/    prefix  → file-write
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - No regex in hot path (exact and prefix matching only)
//! - First match wins

pub mod matcher;
pub mod router;

pub use router::{Endpoint, Route, Router};

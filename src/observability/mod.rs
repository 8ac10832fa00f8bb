//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with connection_id / method / target / status fields
//!
//! Consumers:
//!     → logging.rs (stdout, pretty or JSON)
//! ```

pub mod logging;

//! Minimal HTTP/1.1 server built directly on TCP sockets.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ net::listener ──▶ http::server ──▶ http::request (parse)
//!                                     │
//!                                     ▼
//!                              routing::router ──▶ http::handlers
//!                                     │                 │
//!                                     │                 ▼
//!                                     │          storage / compress
//!   Client ◀── close ◀── http::response (serialize) ◀──┘
//! ```
//!
//! One request per connection. Configuration is resolved once at startup
//! and shared read-only with every connection task.

pub mod cli;
pub mod compress;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod storage;

pub use config::ServerConfig;
pub use error::ServerError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

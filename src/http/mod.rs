//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept, read loop, idle timeout)
//!     → request.rs (parse buffered bytes into a Request)
//!     → [routing layer picks an endpoint]
//!     → handlers.rs (build the Response)
//!     → response.rs (serialize onto the wire)
//!     → close
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{Method, Request, RequestParser};
pub use response::{Response, Status};
pub use server::{AppState, HttpServer};

//! Response descriptors and wire serialization.
//!
//! # Responsibilities
//! - Enumerate the status lines the server emits
//! - Hold ordered headers and the raw body
//! - Render the exact HTTP/1.1 byte sequence
//!
//! # Design Decisions
//! - Headers keep insertion order so output is reproducible byte for byte
//! - Helpers that set a body also set a matching `Content-Length`

use super::request::CRLF;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_ENCODING: &str = "Content-Encoding";

pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Created,
    NotFound,
    InternalServerError,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
        }
    }

    /// Code and reason phrase as they appear in the status line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "200 OK",
            Status::Created => "201 Created",
            Status::NotFound => "404 Not Found",
            Status::InternalServerError => "500 Internal Server Error",
        }
    }
}

/// A response prior to serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// A response with no headers and no body.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(Status::NotFound)
    }

    pub fn internal_error() -> Self {
        Self::new(Status::InternalServerError)
    }

    /// `200 OK` carrying `body` with the given content type and its length.
    pub fn ok_with_body(content_type: &str, body: Vec<u8>) -> Self {
        Self::new(Status::Ok)
            .header(CONTENT_TYPE, content_type)
            .with_body(body)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach `body` and append its `Content-Length`.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.headers
            .push((CONTENT_LENGTH.to_string(), body.len().to_string()));
        self.body = body;
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Render status line, headers, blank line and body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + self.body.len());
        out.extend_from_slice(b"HTTP/1.1 ");
        out.extend_from_slice(self.status.as_str().as_bytes());
        out.extend_from_slice(CRLF);
        for (name, value) in &self.headers {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(CRLF);
        }
        out.extend_from_slice(CRLF);
        out.extend_from_slice(&self.body);
        out
    }
}

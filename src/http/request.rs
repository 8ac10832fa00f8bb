//! Request parsing.
//!
//! # Responsibilities
//! - Detect when enough bytes have arrived to form a request
//! - Split the request line into method and target
//! - Collect headers into a lower-cased lookup map
//! - Hand the remaining bytes over as the body
//!
//! # Design Decisions
//! - Parsing never fails: a request line without a space yields an empty
//!   method and target, which the router sends to Not Found
//! - Completion detection sits behind [`RequestParser`] so the body
//!   strategy can change without touching handlers
//! - Raw header lines are retained next to the map for handlers that need
//!   exact-case matching

use std::collections::HashMap;
use std::fmt;

/// Line terminator.
pub const CRLF: &[u8] = b"\r\n";

/// Header block terminator.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Request method. Only the verbs the router knows get their own variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl Method {
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Other(other) => other,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Raw request path as sent by the client.
    pub target: String,
    /// Header values keyed by lower-cased name. Last one wins.
    pub headers: HashMap<String, String>,
    /// Header lines exactly as received, without terminators.
    pub header_lines: Vec<String>,
    pub body: Vec<u8>,
}

impl Request {
    /// Parse a header block and attach `body`.
    ///
    /// `head` is everything before the header terminator.
    pub fn from_parts(head: &[u8], body: Vec<u8>) -> Self {
        let head = String::from_utf8_lossy(head);
        let mut lines = head.split("\r\n");

        let request_line = lines.next().unwrap_or_default();
        let (method, target) = match request_line.split_once(' ') {
            Some((method, rest)) => {
                let target = rest.split(' ').next().unwrap_or_default();
                (Method::parse(method), target.to_string())
            }
            None => (Method::Other(String::new()), String::new()),
        };

        let mut headers = HashMap::new();
        let mut header_lines = Vec::new();
        for line in lines.take_while(|line| !line.is_empty()) {
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
            }
            header_lines.push(line.to_string());
        }

        Self {
            method,
            target,
            headers,
            header_lines,
            body,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Outcome of feeding buffered bytes to a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Complete(Request),
    Incomplete,
}

/// Decides when buffered bytes form a whole request.
pub trait RequestParser: Send + Sync + fmt::Debug {
    /// Try to build a request from the bytes received so far.
    fn parse(&self, buf: &[u8]) -> Parsed;

    /// Build a request from whatever arrived before the peer closed its
    /// write half.
    fn finish(&self, buf: &[u8]) -> Request {
        match split_head(buf) {
            Some((head, body)) => Request::from_parts(head, body.to_vec()),
            None => Request::from_parts(buf, Vec::new()),
        }
    }
}

/// Complete as soon as the header block is terminated. The body is
/// whatever follows in the same buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderBlockParser;

impl RequestParser for HeaderBlockParser {
    fn parse(&self, buf: &[u8]) -> Parsed {
        match split_head(buf) {
            Some((head, body)) => Parsed::Complete(Request::from_parts(head, body.to_vec())),
            None => Parsed::Incomplete,
        }
    }
}

/// Waits for `Content-Length` bytes of body after the header block.
///
/// A missing or unparsable length means no body is awaited.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentLengthParser;

impl RequestParser for ContentLengthParser {
    fn parse(&self, buf: &[u8]) -> Parsed {
        let Some((head, body)) = split_head(buf) else {
            return Parsed::Incomplete;
        };

        let mut request = Request::from_parts(head, Vec::new());
        let expected = request
            .header("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);

        if body.len() < expected {
            return Parsed::Incomplete;
        }

        request.body = body[..expected].to_vec();
        Parsed::Complete(request)
    }
}

/// Split at the first header terminator into (head, body).
pub fn split_head(buf: &[u8]) -> Option<(&[u8], &[u8])> {
    find(buf, HEADER_TERMINATOR)
        .map(|pos| (&buf[..pos], &buf[pos + HEADER_TERMINATOR.len()..]))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

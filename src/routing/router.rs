//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the fixed, ordered route table
//! - Look up the first route matching a request
//! - Fall back to Not Found when nothing matches
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - O(n) scan in priority order; first match wins

use std::fmt;

use crate::http::request::{Method, Request};
use crate::routing::matcher::{
    AndMatcher, ExactPathMatcher, Matcher, MethodMatcher, PathPrefixMatcher,
};

/// Path prefix of the echo route.
pub const ECHO_PREFIX: &str = "/echo/";
/// Path prefix of the user agent route.
pub const USER_AGENT_PREFIX: &str = "/user-agent";
/// Path prefix of both file routes.
pub const FILES_PREFIX: &str = "/files/";

/// The handler a route dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Root,
    Echo,
    UserAgent,
    FileRead,
    FileWrite,
    NotFound,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Root => "root",
            Endpoint::Echo => "echo",
            Endpoint::UserAgent => "user-agent",
            Endpoint::FileRead => "file-read",
            Endpoint::FileWrite => "file-write",
            Endpoint::NotFound => "not-found",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method and path condition paired with an endpoint.
#[derive(Debug)]
pub struct Route {
    matcher: Box<dyn Matcher>,
    pub endpoint: Endpoint,
}

impl Route {
    pub fn exact(method: Method, path: &str, endpoint: Endpoint) -> Self {
        Self::new(method, Box::new(ExactPathMatcher::new(path)), endpoint)
    }

    pub fn prefix(method: Method, prefix: &str, endpoint: Endpoint) -> Self {
        Self::new(method, Box::new(PathPrefixMatcher::new(prefix)), endpoint)
    }

    fn new(method: Method, path: Box<dyn Matcher>, endpoint: Endpoint) -> Self {
        Self {
            matcher: Box::new(AndMatcher::new(vec![
                Box::new(MethodMatcher::new(method)),
                path,
            ])),
            endpoint,
        }
    }

    pub fn matches(&self, req: &Request) -> bool {
        self.matcher.matches(req)
    }
}

/// Ordered route table.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// First route whose method and path both match.
    pub fn match_request(&self, req: &Request) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(req))
    }

    /// Endpoint for `req`, or [`Endpoint::NotFound`] when no route matches.
    pub fn dispatch(&self, req: &Request) -> Endpoint {
        self.match_request(req)
            .map(|route| route.endpoint)
            .unwrap_or(Endpoint::NotFound)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for Router {
    /// The server's route table, in priority order.
    fn default() -> Self {
        Self::new(vec![
            Route::exact(Method::Get, "/", Endpoint::Root),
            Route::prefix(Method::Get, ECHO_PREFIX, Endpoint::Echo),
            Route::prefix(Method::Get, USER_AGENT_PREFIX, Endpoint::UserAgent),
            Route::prefix(Method::Get, FILES_PREFIX, Endpoint::FileRead),
            Route::prefix(Method::Post, FILES_PREFIX, Endpoint::FileWrite),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch(request_line: &str) -> Endpoint {
        let req = Request::from_parts(request_line.as_bytes(), Vec::new());
        Router::default().dispatch(&req)
    }

    #[test]
    fn fixed_table() {
        assert_eq!(Router::default().len(), 5);
        assert_eq!(dispatch("GET / HTTP/1.1"), Endpoint::Root);
        assert_eq!(dispatch("GET /echo/abc HTTP/1.1"), Endpoint::Echo);
        assert_eq!(dispatch("GET /user-agent HTTP/1.1"), Endpoint::UserAgent);
        assert_eq!(dispatch("GET /user-agents/x HTTP/1.1"), Endpoint::UserAgent);
        assert_eq!(dispatch("GET /files/a.txt HTTP/1.1"), Endpoint::FileRead);
        assert_eq!(dispatch("POST /files/a.txt HTTP/1.1"), Endpoint::FileWrite);
    }

    #[test]
    fn unmatched_falls_back_to_not_found() {
        assert_eq!(dispatch("GET /nonexistent HTTP/1.1"), Endpoint::NotFound);
        assert_eq!(dispatch("GET /echo HTTP/1.1"), Endpoint::NotFound);
        assert_eq!(dispatch("POST / HTTP/1.1"), Endpoint::NotFound);
        assert_eq!(dispatch("POST /echo/a HTTP/1.1"), Endpoint::NotFound);
        assert_eq!(dispatch("PUT /files/a HTTP/1.1"), Endpoint::NotFound);
        assert_eq!(dispatch("get / HTTP/1.1"), Endpoint::NotFound);
        assert_eq!(dispatch("GARBAGE"), Endpoint::NotFound);
    }

    #[test]
    fn first_match_wins() {
        let router = Router::new(vec![
            Route::prefix(Method::Get, "/", Endpoint::Echo),
            Route::exact(Method::Get, "/", Endpoint::Root),
        ]);
        let req = Request::from_parts(b"GET / HTTP/1.1", Vec::new());
        assert_eq!(router.dispatch(&req), Endpoint::Echo);
    }
}

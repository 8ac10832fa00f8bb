//! HTTP server: accept loop and per-connection pipeline.
//!
//! # Responsibilities
//! - Accept connections from the bounded listener
//! - Read until the parser reports a complete request
//! - Dispatch through the router to a handler
//! - Serialize the response, then close the connection
//! - Stop accepting on shutdown and drain in-flight connections

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::http::request::{
    ContentLengthParser, HeaderBlockParser, Parsed, Request, RequestParser,
};
use crate::net::{
    ConnectionGuard, ConnectionState, ConnectionTracker, Listener, ListenerError,
};
use crate::routing::Router;
use crate::storage::FileStore;

const READ_CHUNK: usize = 4096;

/// Pause after a failed accept, e.g. when the process is out of descriptors.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Shared, read-only state handed to every connection task.
#[derive(Debug, Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub files: FileStore,
    pub parser: Arc<dyn RequestParser>,
    pub idle_timeout: Option<Duration>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Self {
        let parser: Arc<dyn RequestParser> = if config.parser.await_content_length {
            Arc::new(ContentLengthParser)
        } else {
            Arc::new(HeaderBlockParser)
        };

        let idle_timeout = match config.timeouts.idle_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            router: Arc::new(Router::default()),
            files: FileStore::new(&config.files.directory),
            parser,
            idle_timeout,
        }
    }
}

/// HTTP server bound to one listener.
pub struct HttpServer {
    state: AppState,
    tracker: ConnectionTracker,
    shutdown_grace: Duration,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            state: AppState::from_config(config),
            tracker: ConnectionTracker::new(),
            shutdown_grace: Duration::from_secs(config.timeouts.shutdown_grace_secs),
        }
    }

    /// Accept connections until `shutdown` fires, then drain.
    ///
    /// Dropping every shutdown sender does not stop the server.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Accept)?;
        tracing::info!(
            address = %addr,
            directory = %self.state.files.base().display(),
            "HTTP server starting"
        );

        loop {
            tokio::select! {
                _ = shutdown_requested(&mut shutdown) => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr, permit)) => {
                        let state = self.state.clone();
                        let guard = self.tracker.track();
                        tokio::spawn(async move {
                            serve_connection(stream, peer_addr, state, guard).await;
                            drop(permit);
                        });
                    }
                    Err(ListenerError::Closed) => return Err(ListenerError::Closed),
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                        if accept_backoff(&mut shutdown, ACCEPT_ERROR_BACKOFF).await {
                            tracing::info!("Shutdown signal received, no longer accepting");
                            break;
                        }
                    }
                },
            }
        }

        let active = self.tracker.active_count();
        if active > 0 {
            tracing::info!(active, "Draining connections");
            if !self.tracker.wait_for_shutdown(self.shutdown_grace).await {
                tracing::warn!(
                    remaining = self.tracker.active_count(),
                    "Shutdown grace period elapsed with connections open"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve once shutdown is triggered. Never resolves after every sender is
/// gone, so a dropped coordinator cannot stop the accept loop.
async fn shutdown_requested(shutdown: &mut broadcast::Receiver<()>) {
    match shutdown.recv().await {
        Ok(()) | Err(RecvError::Lagged(_)) => {}
        Err(RecvError::Closed) => std::future::pending().await,
    }
}

/// Wait `delay` before the next accept. Returns true if shutdown fired meanwhile.
async fn accept_backoff(shutdown: &mut broadcast::Receiver<()>, delay: Duration) -> bool {
    tokio::select! {
        _ = shutdown_requested(shutdown) => true,
        _ = tokio::time::sleep(delay) => false,
    }
}

/// Serve exactly one request on `stream`, then close it.
async fn serve_connection(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    state: AppState,
    mut guard: ConnectionGuard,
) {
    let connection_id = guard.id();
    tracing::debug!(
        connection_id = %connection_id,
        peer_addr = %peer_addr,
        "Connection opened"
    );

    let read = read_request(&mut stream, state.parser.as_ref());
    let request = match state.idle_timeout {
        Some(limit) => match tokio::time::timeout(limit, read).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(
                    connection_id = %connection_id,
                    "Idle timeout before complete request"
                );
                guard.transition(ConnectionState::Closed);
                return;
            }
        },
        None => read.await,
    };

    let request = match request {
        Ok(Some(request)) => request,
        Ok(None) => {
            tracing::debug!(
                connection_id = %connection_id,
                "Peer closed without sending a request"
            );
            guard.transition(ConnectionState::Closed);
            return;
        }
        Err(e) => {
            tracing::warn!(connection_id = %connection_id, error = %e, "Read failed");
            guard.transition(ConnectionState::Closed);
            return;
        }
    };

    guard.transition(ConnectionState::Dispatched);
    let endpoint = state.router.dispatch(&request);
    let response = handlers::handle(endpoint, &request, &state.files).await;

    tracing::info!(
        connection_id = %connection_id,
        method = %request.method,
        target = %request.target,
        route = %endpoint,
        status = response.status.code(),
        bytes = response.body.len(),
        "Request handled"
    );

    if let Err(e) = write_response(&mut stream, &response.to_bytes()).await {
        tracing::warn!(connection_id = %connection_id, error = %e, "Failed to send response");
    }
    guard.transition(ConnectionState::Closed);
}

/// Read from `stream` until `parser` yields a request.
///
/// Returns `None` if the peer closed before sending anything.
async fn read_request(
    stream: &mut TcpStream,
    parser: &dyn RequestParser,
) -> std::io::Result<Option<Request>> {
    let mut buf = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            return Ok(Some(parser.finish(&buf)));
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Parsed::Complete(request) = parser.parse(&buf) {
            return Ok(Some(request));
        }
    }
}

async fn write_response(stream: &mut TcpStream, bytes: &[u8]) -> std::io::Result<()> {
    stream.write_all(bytes).await?;
    stream.flush().await?;
    stream.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::config::ListenerConfig;
    use crate::lifecycle::Shutdown;

    #[tokio::test]
    async fn accept_backoff_waits_for_delay() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        let start = Instant::now();
        assert!(!accept_backoff(&mut rx, Duration::from_millis(200)).await);
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn accept_backoff_ends_early_on_shutdown() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        shutdown.trigger();

        let start = Instant::now();
        assert!(accept_backoff(&mut rx, Duration::from_secs(10)).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn dropped_shutdown_keeps_serving() {
        let config = ServerConfig {
            listener: ListenerConfig {
                bind_address: "127.0.0.1:0".into(),
                max_connections: 4,
            },
            ..ServerConfig::default()
        };
        let listener = Listener::bind(&config.listener).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        drop(shutdown);

        let server = tokio::spawn(HttpServer::new(&config).run(listener, rx));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!server.is_finished());

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        assert_eq!(response, b"HTTP/1.1 200 OK\r\n\r\n");

        server.abort();
    }
}

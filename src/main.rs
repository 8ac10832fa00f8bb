use clap::Parser;

use http_server::cli::Cli;
use http_server::config::resolve_config;
use http_server::lifecycle::{signals, Shutdown};
use http_server::net::Listener;
use http_server::observability::logging;
use http_server::{HttpServer, ServerError};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();
    let config = resolve_config(cli.directory)?;

    logging::init(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        directory = %config.files.directory,
        idle_timeout_secs = config.timeouts.idle_secs,
        "Configuration loaded"
    );

    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    let server = HttpServer::new(&config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

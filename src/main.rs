// src/main.rs
// =============================================================================
// This is the entry point of the relay server.
//
// What happens here:
// 1. Set up logging (RUST_LOG controls the level)
// 2. Parse configuration from flags / environment variables
//    (clap exits the process right away if CLIENT_ID or CLIENT_SECRET is missing)
// 3. Build the router and bind the listening socket
// 4. Serve until Ctrl-C / SIGTERM
//
// Exit codes: 0 = clean shutdown, 1 = startup or server error,
// 2 = bad configuration (reported by clap)
// =============================================================================

mod config;        // src/config.rs - process-wide configuration
mod github;        // src/github/ - outbound GitHub client
mod server;        // src/server/ - inbound HTTP endpoints

#[cfg(test)]
mod testing;       // src/testing.rs - fake GitHub for tests

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "vault_relay=info,tower_http=info";

#[tokio::main]
async fn main() {
    init_tracing();

    // Missing credentials end the process here, before anything is bound
    let config = Config::parse();

    let exit_code = match run(config).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: Config) -> Result<()> {
    let app = server::app(&config)?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    match config.frontend_url.as_deref() {
        Some(origin) => tracing::info!(%origin, "CORS restricted to front-end"),
        None => tracing::warn!("FRONTEND_URL not set, allowing any origin"),
    }
    tracing::info!("Server running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

// Resolves on Ctrl-C, or on SIGTERM where that exists
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

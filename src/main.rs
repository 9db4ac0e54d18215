// petcare-assist - AI pet-care assistant backend
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use petcare_assist::cli::Args;
use petcare_assist::config::AppConfig;
use petcare_assist::gemini::GeminiClient;
use petcare_assist::places::TomTomClient;
use petcare_assist::server::{create_router, AppState};
use petcare_assist::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting petcare-assist v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Provider clients
    let gemini_client = GeminiClient::new(&config.gemini)?;
    let places_client = TomTomClient::new(&config.places)?;
    info!(
        "Models: text={}, media={}",
        config.gemini.text_model, config.gemini.media_model
    );

    // Phase 4: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(
        "Response cache TTL {}s, media keys {:?}",
        config.cache.ttl_seconds, config.cache.media_key
    );
    let state = AppState::new(config, Arc::new(gemini_client), Arc::new(places_client));
    let app = create_router(state)?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::console::ConsoleCore;
use crate::application::console_service::{ConsoleService, ConsoleTiming};
use crate::domain::channel::weather_station_catalog;
use crate::infrastructure::config::load_config;
use crate::infrastructure::ha_history::HomeAssistantHistory;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    channel_trend, close_trend, get_console, health_check, interact, push_states,
    select_channel, start_console, stop_console, stream_console,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config()?;

    // History source (infrastructure layer)
    let history = Arc::new(HomeAssistantHistory::new(
        config.history.host.clone(),
        config.history.token.clone(),
    ));

    // Console (application layer)
    let core = ConsoleCore::new(weather_station_catalog(), &config.entity_bindings(), &config.console);
    let console = ConsoleService::spawn(core, history, ConsoleTiming::from(&config.console));
    console.start().await?;

    let state = Arc::new(AppState {
        console: console.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/console", get(get_console))
        .route("/console/stream", get(stream_console))
        .route("/states", post(push_states))
        .route("/start", post(start_console))
        .route("/stop", post(stop_console))
        .route("/channels/:id/select", post(select_channel))
        .route("/channels/:id/trend", get(channel_trend))
        .route("/interact", post(interact))
        .route("/close", post(close_trend))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting weather-console service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    console.stop().await?;
    tracing::info!("Console stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

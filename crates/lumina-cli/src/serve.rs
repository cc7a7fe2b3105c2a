//! `lumina serve` — run the HTTP API until Ctrl+C.
//!
//! Startup sequence:
//! 1. Load config, apply `--host`/`--port` overrides
//! 2. Build the dispatcher (HTTP transport + fallback chain)
//! 3. Bind the listener and serve until Ctrl+C

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::net::TcpListener;
use tracing::{info, warn};

use lumina_core::config::load_config;

use crate::build_dispatcher;

/// Run the API server.
pub async fn run(config_path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(config_path.as_deref());
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let dispatcher = Arc::new(build_dispatcher(&config)?);
    let statuses = dispatcher.provider_statuses();
    let ready = statuses.iter().filter(|s| s.configured || s.key_optional).count();
    if !statuses.iter().any(|s| s.configured) {
        warn!("no provider API keys configured; only keyless providers can answer");
    }

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    println!();
    println!("{}  v{}", "✨ Lumina".cyan().bold(), env!("CARGO_PKG_VERSION").dimmed());
    println!("  Mode: API server on http://{addr}");
    println!("  Providers ready: {ready}/{}", statuses.len());
    println!("  Press Ctrl+C to stop.");
    println!();

    lumina_server::serve(listener, dispatcher, shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

// ABOUTME: Server binary for the Copiloto API
// ABOUTME: Loads configuration, initializes logging, and serves the HTTP endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! # Copiloto API Server Binary
//!
//! Starts the HTTP server that proxies chat and checklist requests to the
//! external AI services.

use anyhow::Result;
use clap::Parser;
use copiloto_server::{
    config::ServerConfig, logging, resources::ServerResources, server::HttpServer,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "copiloto-server")]
#[command(about = "Copiloto API - AI chat over vehicle manuals and pre-trip checklists")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting Copiloto API server");
    info!("{}", config.summary());

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(config)?);

    // Missing credentials are not fatal; the affected endpoint answers 500.
    if !resources.assistant.is_configured() {
        warn!("Assistant credentials missing; /chat-assistant will answer with a configuration error");
    }
    if !resources.gateway.is_configured() {
        warn!("Gateway key missing; /travel-checklist will answer with a configuration error");
    }

    display_available_endpoints(port);

    let server = HttpServer::new(resources);
    if let Err(e) = server.run(port).await {
        error!("Server error: {e}");
        return Err(e);
    }

    Ok(())
}

/// Display the available API endpoints at startup
fn display_available_endpoints(port: u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());

    info!("=== Available API Endpoints ===");
    info!("   Chat proxy:      POST http://{host}:{port}/chat-assistant?action={{start|status|sync}}");
    info!("   Checklist proxy: POST http://{host}:{port}/travel-checklist");
    info!("   Health check:    GET  http://{host}:{port}/health");
    info!("=== End of Endpoint List ===");
}

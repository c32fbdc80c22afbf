// ABOUTME: HTTP server assembly for the Copiloto API
// ABOUTME: Builds the axum router with middleware layers and runs the listener
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! HTTP server assembly
//!
//! Merges the route groups, applies the CORS response-header layers and
//! request tracing, and serves on the configured port.

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors;
use crate::resources::ServerResources;
use crate::routes::{ChatRoutes, ChecklistRoutes, HealthRoutes};

/// The Copiloto HTTP server
pub struct HttpServer {
    resources: Arc<ServerResources>,
}

impl HttpServer {
    /// Create a server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Build the complete application router
    ///
    /// The CORS layers sit outside everything so that error responses and
    /// preflights carry the permissive headers too.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .merge(ChatRoutes::routes(self.resources.clone()))
            .merge(ChecklistRoutes::routes(self.resources.clone()))
            .merge(HealthRoutes::routes())
            .layer(TraceLayer::new_for_http())
            .layer(cors::allow_origin_layer())
            .layer(cors::allow_headers_layer())
    }

    /// Bind the listener and serve until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the server fails.
    pub async fn run(self, port: u16) -> Result<()> {
        let router = self.router();
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("Failed to bind HTTP port {port}"))?;

        info!("HTTP server listening on port {port}");

        axum::serve(listener, router)
            .await
            .context("HTTP server terminated with an error")
    }
}

// ABOUTME: Shared server resources constructed once at startup
// ABOUTME: Bundles configuration and the upstream AI clients for handler injection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! Shared server resources
//!
//! Everything a handler needs is built once here and shared via `Arc` as
//! axum state: the configuration snapshot and the two upstream clients.
//! This is the explicit alternative to handlers reading the environment
//! ad hoc — configuration is resolved at process start and only flows
//! through this struct.

use std::sync::Arc;

use crate::assistant::AssistantClient;
use crate::config::ServerConfig;
use crate::errors::AppError;
use crate::llm::AiGatewayClient;

/// Shared, immutable resources for all route handlers
pub struct ServerResources {
    /// Configuration snapshot taken at startup
    pub config: Arc<ServerConfig>,
    /// Assistants API client (chat proxy)
    pub assistant: AssistantClient,
    /// Chat-completion gateway client (checklist proxy)
    pub gateway: AiGatewayClient,
}

impl ServerResources {
    /// Build the resources from a configuration snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed. Missing
    /// upstream credentials are not an error here; they surface per
    /// request.
    pub fn new(config: ServerConfig) -> Result<Self, AppError> {
        let assistant = AssistantClient::new(&config.assistant)?;
        let gateway = AiGatewayClient::new(&config.gateway)?;

        Ok(Self {
            config: Arc::new(config),
            assistant,
            gateway,
        })
    }
}

// ABOUTME: Main library entry point for the Copiloto API server
// ABOUTME: Proxies chat and checklist requests between the frontend and external AI services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

#![deny(unsafe_code)]

//! # Copiloto API Server
//!
//! Backend for the vehicle-assistance web product: a chat interface over a
//! vehicle owner's manual and a personalized pre-trip checklist generator.
//! Both endpoints are thin stateless proxies in front of external AI
//! services — an Assistants-API thread service for chat, and an
//! OpenAI-compatible completion gateway for checklists. All conversation
//! state lives upstream; the server holds nothing between requests.
//!
//! ## Endpoints
//!
//! - `POST /chat-assistant?action={start|status|sync}` — thread-based chat
//! - `POST /travel-checklist` — checklist generation from a travel form
//! - `GET /health` — liveness for monitoring
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use copiloto_server::config::ServerConfig;
//! use copiloto_server::resources::ServerResources;
//! use copiloto_server::server::HttpServer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let port = config.http_port;
//!     let resources = Arc::new(ServerResources::new(config)?);
//!     HttpServer::new(resources).run(port).await
//! }
//! ```

/// Assistants API client for thread-based chat
pub mod assistant;

/// Configuration management
pub mod config;

/// Application constants and default configuration values
pub mod constants;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Chat-completion types, gateway client, and prompt builders
pub mod llm;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware (CORS)
pub mod middleware;

/// Common data models for the travel form and checklist contracts
pub mod models;

/// Shared server resources for handler injection
pub mod resources;

/// HTTP routes organized by domain
pub mod routes;

/// HTTP server assembly
pub mod server;

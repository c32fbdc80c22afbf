// ABOUTME: Configuration management for the Copiloto API server
// ABOUTME: Re-exports the environment-backed server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! Configuration management
//!
//! Configuration is read from the process environment exactly once at
//! startup and threaded through `ServerResources` into every handler.

/// Environment-based configuration for production deployment
pub mod environment;

pub use environment::{AssistantConfig, GatewayConfig, ServerConfig};

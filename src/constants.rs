// ABOUTME: System-wide constants and default configuration values for the Copiloto API
// ABOUTME: Contains network defaults, upstream endpoints, and checklist validation constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! # Constants Module
//!
//! Application constants and default configuration values. Environment
//! variable names live next to the config structs that read them; this
//! module holds the values themselves.

/// Network port defaults
pub mod ports {
    /// Default HTTP port for the API server
    pub const DEFAULT_HTTP_PORT: u16 = 8787;
}

/// Service identity
pub mod service_names {
    /// Service name used in structured logs
    pub const COPILOTO_SERVER: &str = "copiloto-server";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Upstream AI service defaults
pub mod upstream {
    /// Default base URL for the Assistants API
    pub const DEFAULT_ASSISTANT_BASE_URL: &str = "https://api.openai.com/v1";

    /// Assistants API version header value
    pub const ASSISTANTS_BETA_HEADER: &str = "assistants=v2";

    /// Default base URL for the chat-completion gateway
    pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1";

    /// Default model requested from the gateway
    pub const DEFAULT_GATEWAY_MODEL: &str = "google/gemini-3-flash-preview";

    /// Connection timeout for upstream clients
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;

    /// Request timeout for upstream clients (AI generation can be slow)
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Interval between run status polls in the synchronous chat path
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

    /// Total budget for run polling before the request gives up.
    /// Stands in for the hosting platform's execution-time limit that
    /// bounded the original synchronous path.
    pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 120;

    /// How many thread messages to fetch when extracting the latest reply
    pub const MESSAGE_FETCH_LIMIT: u8 = 20;
}

/// Checklist generation parameters
pub mod checklist {
    /// Sampling temperature for checklist generation
    pub const GATEWAY_TEMPERATURE: f32 = 0.7;

    /// Token ceiling for checklist generation
    pub const GATEWAY_MAX_TOKENS: u32 = 4000;

    /// Field names reported to the client when required travel-form
    /// fields are absent. Matches the frontend form schema.
    pub const REQUIRED_FIELDS: [&str; 8] = [
        "distance",
        "routeType",
        "vehicleType",
        "vehicleYear",
        "vehicleBrand",
        "vehicleModel",
        "availableTime",
        "userLevel",
    ];
}

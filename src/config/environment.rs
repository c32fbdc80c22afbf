// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, upstream credentials, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! Environment-based configuration management
//!
//! All configuration is read here, once, at process start. Missing AI
//! credentials are not fatal: the fields stay `None` and the affected
//! endpoint answers HTTP 500 per request, which is the behavior the
//! frontend was built against.

use crate::constants::{ports, upstream};
use anyhow::{Context, Result};
use std::env;
use url::Url;

/// Environment variable for the HTTP listen port
const HTTP_PORT_ENV: &str = "HTTP_PORT";

/// Environment variable for the Assistants API key
const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable for the assistant identifier
const OPENAI_ASSISTANT_ID_ENV: &str = "OPENAI_ASSISTANT_ID";

/// Environment variable overriding the Assistants API base URL
const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Environment variable overriding the run poll interval (milliseconds)
const OPENAI_POLL_INTERVAL_MS_ENV: &str = "OPENAI_POLL_INTERVAL_MS";

/// Environment variable overriding the run poll budget (seconds)
const OPENAI_RUN_TIMEOUT_SECS_ENV: &str = "OPENAI_RUN_TIMEOUT_SECS";

/// Environment variable for the AI gateway key
const LOVABLE_API_KEY_ENV: &str = "LOVABLE_API_KEY";

/// Environment variable overriding the AI gateway base URL
const AI_GATEWAY_BASE_URL_ENV: &str = "AI_GATEWAY_BASE_URL";

/// Environment variable overriding the gateway model
const AI_GATEWAY_MODEL_ENV: &str = "AI_GATEWAY_MODEL";

/// Configuration for the Assistants API upstream (chat proxy)
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// API key; `None` surfaces as a per-request configuration error
    pub api_key: Option<String>,
    /// Assistant identifier the runs are created against
    pub assistant_id: Option<String>,
    /// Base URL of the Assistants API
    pub base_url: String,
    /// Interval between run status polls in the synchronous path
    pub poll_interval_ms: u64,
    /// Total polling budget before a synchronous request gives up
    pub poll_budget_secs: u64,
}

/// Configuration for the chat-completion gateway upstream (checklist proxy)
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// API key; `None` surfaces as a per-request configuration error
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible gateway
    pub base_url: String,
    /// Model requested for checklist generation
    pub model: String,
}

/// Server configuration, constructed once per process start
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Assistants API settings
    pub assistant: AssistantConfig,
    /// Chat-completion gateway settings
    pub gateway: GatewayConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a configured base URL or numeric override does
    /// not parse. Absent credentials are not an error here.
    pub fn from_env() -> Result<Self> {
        let http_port = parse_env_or(HTTP_PORT_ENV, ports::DEFAULT_HTTP_PORT)?;

        let assistant_base_url = env_or(
            OPENAI_BASE_URL_ENV,
            upstream::DEFAULT_ASSISTANT_BASE_URL,
        );
        validate_base_url(OPENAI_BASE_URL_ENV, &assistant_base_url)?;

        let gateway_base_url = env_or(
            AI_GATEWAY_BASE_URL_ENV,
            upstream::DEFAULT_GATEWAY_BASE_URL,
        );
        validate_base_url(AI_GATEWAY_BASE_URL_ENV, &gateway_base_url)?;

        Ok(Self {
            http_port,
            assistant: AssistantConfig {
                api_key: secret_env(OPENAI_API_KEY_ENV),
                assistant_id: secret_env(OPENAI_ASSISTANT_ID_ENV),
                base_url: assistant_base_url,
                poll_interval_ms: parse_env_or(
                    OPENAI_POLL_INTERVAL_MS_ENV,
                    upstream::DEFAULT_POLL_INTERVAL_MS,
                )?,
                poll_budget_secs: parse_env_or(
                    OPENAI_RUN_TIMEOUT_SECS_ENV,
                    upstream::DEFAULT_RUN_TIMEOUT_SECS,
                )?,
            },
            gateway: GatewayConfig {
                api_key: secret_env(LOVABLE_API_KEY_ENV),
                base_url: gateway_base_url,
                model: env_or(AI_GATEWAY_MODEL_ENV, upstream::DEFAULT_GATEWAY_MODEL),
            },
        })
    }

    /// One-line startup summary with secrets reduced to presence flags
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} assistant_base={} assistant_key={} assistant_id={} gateway_base={} gateway_key={} gateway_model={}",
            self.http_port,
            self.assistant.base_url,
            presence(self.assistant.api_key.as_deref()),
            presence(self.assistant.assistant_id.as_deref()),
            self.gateway.base_url,
            presence(self.gateway.api_key.as_deref()),
            self.gateway.model,
        )
    }
}

/// Read an env var, falling back to a default when unset or empty
fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Read a secret env var; empty values count as unset
fn secret_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a numeric env var, falling back to a default when unset
fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {name}: {raw}")),
        _ => Ok(default),
    }
}

/// Reject base URLs that would make every upstream call fail later
fn validate_base_url(name: &str, value: &str) -> Result<()> {
    Url::parse(value).with_context(|| format!("Invalid URL in {name}: {value}"))?;
    Ok(())
}

fn presence(value: Option<&str>) -> &'static str {
    if value.is_some() {
        "set"
    } else {
        "missing"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            HTTP_PORT_ENV,
            OPENAI_API_KEY_ENV,
            OPENAI_ASSISTANT_ID_ENV,
            OPENAI_BASE_URL_ENV,
            OPENAI_POLL_INTERVAL_MS_ENV,
            OPENAI_RUN_TIMEOUT_SECS_ENV,
            LOVABLE_API_KEY_ENV,
            AI_GATEWAY_BASE_URL_ENV,
            AI_GATEWAY_MODEL_ENV,
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_environment() {
        clear_env();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, ports::DEFAULT_HTTP_PORT);
        assert_eq!(config.assistant.base_url, upstream::DEFAULT_ASSISTANT_BASE_URL);
        assert_eq!(config.gateway.base_url, upstream::DEFAULT_GATEWAY_BASE_URL);
        assert_eq!(config.gateway.model, upstream::DEFAULT_GATEWAY_MODEL);
        assert!(config.assistant.api_key.is_none());
        assert!(config.gateway.api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_empty_credentials_count_as_missing() {
        clear_env();
        env::set_var(OPENAI_API_KEY_ENV, "");
        env::set_var(LOVABLE_API_KEY_ENV, "  ");

        let config = ServerConfig::from_env().unwrap();
        assert!(config.assistant.api_key.is_none());
        assert!(config.gateway.api_key.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides_are_applied() {
        clear_env();
        env::set_var(HTTP_PORT_ENV, "9100");
        env::set_var(OPENAI_BASE_URL_ENV, "http://127.0.0.1:4010/v1");
        env::set_var(OPENAI_API_KEY_ENV, "sk-test");
        env::set_var(OPENAI_ASSISTANT_ID_ENV, "asst_test");
        env::set_var(AI_GATEWAY_MODEL_ENV, "google/gemini-3-pro");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, 9100);
        assert_eq!(config.assistant.base_url, "http://127.0.0.1:4010/v1");
        assert_eq!(config.assistant.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.gateway.model, "google/gemini-3-pro");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_base_url_is_rejected() {
        clear_env();
        env::set_var(AI_GATEWAY_BASE_URL_ENV, "not a url");

        assert!(ServerConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_summary_masks_secrets() {
        clear_env();
        env::set_var(OPENAI_API_KEY_ENV, "sk-super-secret");

        let config = ServerConfig::from_env().unwrap();
        let summary = config.summary();
        assert!(!summary.contains("sk-super-secret"));
        assert!(summary.contains("assistant_key=set"));
        assert!(summary.contains("gateway_key=missing"));

        clear_env();
    }
}

// ABOUTME: OpenAI-compatible chat-completion client for the AI gateway upstream
// ABOUTME: Maps gateway quota errors onto client-facing 429/402 responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! # AI Gateway Client
//!
//! Client for the OpenAI-compatible `/chat/completions` endpoint used by
//! checklist generation. The gateway is opaque; this client only speaks
//! its HTTP contract and maps its quota statuses onto the responses the
//! frontend expects: 429 becomes a rate-limit message, 402 becomes an
//! insufficient-credits message, and everything else is a 500.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use super::{ChatMessage, ChatRequest, ChatResponse, TokenUsage};
use crate::config::GatewayConfig;
use crate::constants::upstream;
use crate::errors::AppError;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Message structure for the OpenAI-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct CompletionUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

// ============================================================================
// Client Implementation
// ============================================================================

/// Client for the OpenAI-compatible AI gateway
pub struct AiGatewayClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    default_model: String,
}

impl AiGatewayClient {
    /// Create a new gateway client from configuration
    ///
    /// A missing API key is tolerated here; it becomes a per-request
    /// configuration error when a completion is attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &GatewayConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(upstream::CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(upstream::REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            default_model: config.model.clone(),
        })
    }

    /// Default model used when the request does not name one
    #[must_use]
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    /// Require the configured API key
    fn require_api_key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::config("LOVABLE_API_KEY is not configured"))
    }

    /// Whether an API key is configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Map a non-success gateway status onto the client-facing error
    fn map_error_status(status: reqwest::StatusCode, body: &str) -> AppError {
        error!("AI Gateway error: {} {}", status.as_u16(), body);
        match status.as_u16() {
            429 => AppError::rate_limited(
                "Limite de requisições excedido. Tente novamente em alguns minutos.",
            ),
            402 => AppError::credits_exhausted(
                "Créditos insuficientes. Adicione créditos ao seu workspace.",
            ),
            code => AppError::upstream(format!("AI Gateway error: {code}")),
        }
    }

    /// Perform a chat completion
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no API key is set, a rate-limit
    /// or credits error when the gateway says so, and an upstream error for
    /// transport failures, other non-success statuses, or empty replies.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let api_key = self.require_api_key()?;
        let model = request.model.as_deref().unwrap_or(&self.default_model);

        let wire_request = CompletionRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            "Sending chat completion to {} with {} messages, model={model}",
            self.base_url,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach AI gateway: {e}");
                AppError::upstream(format!("Failed to reach AI gateway: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read AI gateway response: {e}");
            AppError::upstream(format!("Failed to read AI gateway response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::map_error_status(status, &body));
        }

        let completion: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse AI gateway response: {e} - body: {}",
                &body[..body.len().min(500)]
            );
            AppError::upstream(format!("Failed to parse AI gateway response: {e}"))
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::upstream("Empty response from AI"))?;

        let content = choice
            .message
            .content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::upstream("Empty response from AI"))?;

        debug!(
            "Received completion: {} chars, finish_reason: {:?}",
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: completion.model.unwrap_or_else(|| model.to_owned()),
            usage: completion.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(api_key: Option<&str>) -> AiGatewayClient {
        AiGatewayClient {
            client: Client::new(),
            base_url: "http://127.0.0.1:1/v1/".to_owned(),
            api_key: api_key.map(str::to_owned),
            default_model: "google/gemini-3-flash-preview".to_owned(),
        }
    }

    #[test]
    fn test_api_url_normalizes_trailing_slash() {
        let client = test_client(Some("key"));
        assert_eq!(
            client.api_url("chat/completions"),
            "http://127.0.0.1:1/v1/chat/completions"
        );
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let client = test_client(None);
        let err = client.require_api_key().err().map(|e| e.message);
        assert_eq!(err.as_deref(), Some("LOVABLE_API_KEY is not configured"));
    }

    #[test]
    fn test_quota_statuses_map_to_portuguese_messages() {
        let rate = AiGatewayClient::map_error_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(rate.http_status(), 429);
        assert!(rate.message.starts_with("Limite de requisições excedido"));

        let credits =
            AiGatewayClient::map_error_status(reqwest::StatusCode::PAYMENT_REQUIRED, "");
        assert_eq!(credits.http_status(), 402);
        assert!(credits.message.starts_with("Créditos insuficientes"));

        let other = AiGatewayClient::map_error_status(reqwest::StatusCode::BAD_GATEWAY, "");
        assert_eq!(other.http_status(), 500);
        assert_eq!(other.message, "AI Gateway error: 502");
    }
}

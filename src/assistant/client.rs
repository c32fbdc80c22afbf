// ABOUTME: HTTP client for the Assistants API upstream (threads, messages, runs)
// ABOUTME: Provides thread lifecycle operations and run polling for the chat proxy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! Assistants API client
//!
//! All calls require both the API key and the assistant id. Either being
//! absent from configuration is reported as a configuration error, which
//! the error layer turns into the HTTP 500 the frontend expects — the
//! server itself never refuses to start over missing credentials.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info};

use super::{MessageList, Run, RunStatus, Thread, ThreadMessage};
use crate::config::AssistantConfig;
use crate::constants::upstream;
use crate::errors::AppError;

/// Error envelope returned by the upstream on failure
#[derive(Debug, Deserialize)]
struct UpstreamErrorResponse {
    error: UpstreamErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

/// Client for the thread-based assistant upstream
pub struct AssistantClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    assistant_id: Option<String>,
    poll_interval: Duration,
    poll_budget: Duration,
}

impl AssistantClient {
    /// Create a new client from configuration
    ///
    /// Missing credentials are tolerated here and surface per request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &AssistantConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(upstream::CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(upstream::REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            assistant_id: config.assistant_id.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            poll_budget: Duration::from_secs(config.poll_budget_secs),
        })
    }

    /// Require both configured credentials, in the order (key, assistant id)
    fn credentials(&self) -> Result<(&str, &str), AppError> {
        match (self.api_key.as_deref(), self.assistant_id.as_deref()) {
            (Some(key), Some(assistant_id)) => Ok((key, assistant_id)),
            _ => Err(AppError::config(
                "Missing environment variables (OPENAI_API_KEY / OPENAI_ASSISTANT_ID)",
            )),
        }
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    /// Attach the auth and API-version headers every call needs
    fn request(
        &self,
        builder: reqwest::RequestBuilder,
        api_key: &str,
    ) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {api_key}"))
            .header("OpenAI-Beta", upstream::ASSISTANTS_BETA_HEADER)
            .header("Content-Type", "application/json")
    }

    /// Send a request and decode the JSON body, mapping failures
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<T, AppError> {
        let response = builder.send().await.map_err(|e| {
            error!("Failed to reach Assistant API ({context}): {e}");
            AppError::upstream(format!("Failed to reach Assistant API: {e}"))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read Assistant API response ({context}): {e}");
            AppError::upstream(format!("Failed to read Assistant API response: {e}"))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<UpstreamErrorResponse>(&body)
                .map_or_else(
                    |_| body.chars().take(200).collect::<String>(),
                    |e| e.error.message,
                );
            error!("Assistant API error ({context}): {} {message}", status.as_u16());
            return Err(AppError::upstream(format!(
                "Assistant API error ({}): {message}",
                status.as_u16()
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Assistant API response ({context}): {e}");
            AppError::upstream(format!("Failed to parse Assistant API response: {e}"))
        })
    }

    /// Create a new conversation thread
    ///
    /// # Errors
    ///
    /// Returns a configuration error when credentials are absent, or an
    /// upstream error when the call fails.
    pub async fn create_thread(&self) -> Result<Thread, AppError> {
        let (api_key, _) = self.credentials()?;
        let builder = self
            .request(self.client.post(self.api_url("threads")), api_key)
            .json(&json!({}));

        let thread: Thread = self.execute(builder, "create thread").await?;
        info!("Thread created: {}", thread.id);
        Ok(thread)
    }

    /// Append a user message to a thread
    ///
    /// # Errors
    ///
    /// Returns a configuration error when credentials are absent, or an
    /// upstream error when the call fails.
    pub async fn add_user_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> Result<ThreadMessage, AppError> {
        let (api_key, _) = self.credentials()?;
        let builder = self
            .request(
                self.client
                    .post(self.api_url(&format!("threads/{thread_id}/messages"))),
                api_key,
            )
            .json(&json!({ "role": "user", "content": content }));

        let message = self.execute(builder, "add message").await?;
        debug!("Message added to thread {thread_id}");
        Ok(message)
    }

    /// Create a run for the configured assistant on a thread
    ///
    /// Returns immediately with the run's initial status; callers that
    /// need the outcome poll via [`Self::retrieve_run`] or use
    /// [`Self::create_run_and_poll`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error when credentials are absent, or an
    /// upstream error when the call fails.
    pub async fn create_run(&self, thread_id: &str) -> Result<Run, AppError> {
        let (api_key, assistant_id) = self.credentials()?;
        let builder = self
            .request(
                self.client
                    .post(self.api_url(&format!("threads/{thread_id}/runs"))),
                api_key,
            )
            .json(&json!({ "assistant_id": assistant_id }));

        let run: Run = self.execute(builder, "create run").await?;
        debug!("Run {} created on thread {thread_id}: {}", run.id, run.status.as_str());
        Ok(run)
    }

    /// Fetch the current state of a run
    ///
    /// # Errors
    ///
    /// Returns a configuration error when credentials are absent, or an
    /// upstream error when the call fails.
    pub async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AppError> {
        let (api_key, _) = self.credentials()?;
        let builder = self.request(
            self.client
                .get(self.api_url(&format!("threads/{thread_id}/runs/{run_id}"))),
            api_key,
        );

        self.execute(builder, "retrieve run").await
    }

    /// Create a run and poll until it reaches a terminal state
    ///
    /// Polling is bounded by the configured budget, which stands in for
    /// the execution-time limit that bounded the synchronous path on the
    /// original hosting platform.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the call fails or the budget runs
    /// out before the run settles.
    pub async fn create_run_and_poll(&self, thread_id: &str) -> Result<Run, AppError> {
        let mut run = self.create_run(thread_id).await?;
        let started = tokio::time::Instant::now();

        while !run.status.is_terminal() {
            if started.elapsed() > self.poll_budget {
                error!("Run {} did not settle within the poll budget", run.id);
                return Err(AppError::upstream(format!(
                    "Timed out waiting for run {} to complete",
                    run.id
                )));
            }
            sleep(self.poll_interval).await;
            run = self.retrieve_run(thread_id, &run.id).await?;
        }

        info!("Run completed: {}", run.status.as_str());
        Ok(run)
    }

    /// List the most recent messages of a thread, newest first
    ///
    /// # Errors
    ///
    /// Returns a configuration error when credentials are absent, or an
    /// upstream error when the call fails.
    pub async fn list_messages(
        &self,
        thread_id: &str,
        limit: u8,
    ) -> Result<Vec<ThreadMessage>, AppError> {
        let (api_key, _) = self.credentials()?;
        let builder = self.request(
            self.client
                .get(self.api_url(&format!("threads/{thread_id}/messages")))
                .query(&[("limit", limit.to_string())]),
            api_key,
        );

        let list: MessageList = self.execute(builder, "list messages").await?;
        Ok(list.data)
    }

    /// Extract the newest assistant-authored text reply from a thread
    ///
    /// Scans the most recent messages for the first assistant message and
    /// returns its first text block, or an empty string when the newest
    /// assistant message carries no text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when credentials are absent, or an
    /// upstream error when the call fails.
    pub async fn latest_assistant_text(&self, thread_id: &str) -> Result<String, AppError> {
        let messages = self
            .list_messages(thread_id, upstream::MESSAGE_FETCH_LIMIT)
            .await?;

        Ok(messages
            .iter()
            .find(|m| m.role == "assistant")
            .and_then(ThreadMessage::first_text)
            .unwrap_or_default()
            .to_owned())
    }

    /// Whether both credentials are configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn test_config(api_key: Option<&str>, assistant_id: Option<&str>) -> AssistantConfig {
        AssistantConfig {
            api_key: api_key.map(str::to_owned),
            assistant_id: assistant_id.map(str::to_owned),
            base_url: "http://127.0.0.1:1/v1/".to_owned(),
            poll_interval_ms: 10,
            poll_budget_secs: 1,
        }
    }

    #[test]
    fn test_missing_credentials_yield_config_error() {
        for (key, id) in [(None, None), (Some("sk-test"), None), (None, Some("asst_1"))] {
            let client = AssistantClient::new(&test_config(key, id)).unwrap();
            assert!(!client.is_configured());
            let err = client.credentials().unwrap_err();
            assert_eq!(err.http_status(), 500);
            assert_eq!(
                err.message,
                "Missing environment variables (OPENAI_API_KEY / OPENAI_ASSISTANT_ID)"
            );
        }
    }

    #[test]
    fn test_api_url_normalizes_trailing_slash() {
        let client = AssistantClient::new(&test_config(Some("sk-test"), Some("asst_1"))).unwrap();
        assert_eq!(client.api_url("threads"), "http://127.0.0.1:1/v1/threads");
    }
}

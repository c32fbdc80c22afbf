// ABOUTME: Chat proxy route handler bridging the frontend to the assistant thread upstream
// ABOUTME: Implements the start/status/sync action dispatch over one POST endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! Chat proxy routes
//!
//! One endpoint, three actions selected by the `action` query parameter:
//!
//! - `sync` (default): append the message, run the assistant, poll until
//!   the run settles, and return the reply in the same response. Blocks
//!   the request for the whole run.
//! - `start`: append the message and create the run, but return
//!   immediately with the identifiers — the non-blocking half of the
//!   split that exists to avoid long-poll timeouts on constrained hosts.
//! - `status`: check a previously started run and, once completed,
//!   return the reply.
//!
//! The handler holds no state between invocations; the thread on the
//! upstream service is the only conversation state that exists.

use crate::errors::AppError;
use crate::middleware::cors::preflight;
use crate::resources::ServerResources;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Action selector carried in the query string
#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    /// `start`, `status`, or `sync`; anything else falls through to sync
    #[serde(default)]
    pub action: Option<String>,
}

/// Request body for the chat proxy
///
/// An unreadable or absent body is treated as empty rather than rejected;
/// the action-specific validation produces the meaningful 400s.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatProxyRequest {
    /// User message to append to the thread
    pub message: Option<String>,
    /// Existing thread to continue; a new thread is created when absent
    #[serde(alias = "thread_id")]
    pub thread_id: Option<String>,
    /// Run to check (status action only)
    #[serde(alias = "run_id")]
    pub run_id: Option<String>,
}

/// Response carrying a run's identifiers and state
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatusResponse {
    /// Current run status
    pub status: String,
    /// Assistant reply, present once the run has completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Thread the run belongs to
    pub thread_id: String,
    /// The run's identifier
    pub run_id: String,
}

/// Response for the synchronous path
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReplyResponse {
    /// Assistant reply text
    pub response: String,
    /// Thread the conversation lives on; the client persists this
    pub thread_id: String,
}

// ============================================================================
// Chat Routes
// ============================================================================

/// Chat proxy routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat proxy routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/chat-assistant",
                post(Self::chat_assistant).options(preflight),
            )
            .with_state(resources)
    }

    /// `POST /chat-assistant?action={start|status|sync}`
    async fn chat_assistant(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ChatQuery>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        // Tolerant body handling: a malformed body is an empty request.
        let request: ChatProxyRequest = serde_json::from_slice(&body).unwrap_or_default();
        let action = query.action.as_deref().unwrap_or("sync");

        debug!(
            action,
            has_thread = request.thread_id.is_some(),
            "Chat proxy request"
        );

        match action {
            "status" => Self::run_status(&resources, request).await,
            "start" => Self::start_run(&resources, request).await,
            _ => Self::run_sync(&resources, request).await,
        }
    }

    /// Check an existing run; return the reply once completed
    async fn run_status(
        resources: &ServerResources,
        request: ChatProxyRequest,
    ) -> Result<Response, AppError> {
        let (Some(thread_id), Some(run_id)) = (request.thread_id, request.run_id) else {
            return Err(AppError::invalid_input(
                r#"Send { "threadId": "...", "runId": "..." }"#,
            ));
        };

        let run = resources.assistant.retrieve_run(&thread_id, &run_id).await?;

        if !matches!(run.status, crate::assistant::RunStatus::Completed) {
            let response = RunStatusResponse {
                status: run.status.as_str().to_owned(),
                response: None,
                thread_id,
                run_id,
            };
            return Ok((StatusCode::OK, Json(response)).into_response());
        }

        let reply = resources.assistant.latest_assistant_text(&thread_id).await?;
        let response = RunStatusResponse {
            status: "completed".to_owned(),
            response: Some(reply),
            thread_id,
            run_id,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Resolve the thread to use, creating one when the client has none,
    /// and append the user message to it
    async fn prepare_thread(
        resources: &ServerResources,
        request: ChatProxyRequest,
    ) -> Result<String, AppError> {
        let message = request
            .message
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::invalid_input("Message is required"))?;

        let thread_id = match request.thread_id {
            Some(id) => id,
            None => resources.assistant.create_thread().await?.id,
        };

        resources
            .assistant
            .add_user_message(&thread_id, &message)
            .await?;

        Ok(thread_id)
    }

    /// Create the run and return immediately with its identifiers
    async fn start_run(
        resources: &ServerResources,
        request: ChatProxyRequest,
    ) -> Result<Response, AppError> {
        let thread_id = Self::prepare_thread(resources, request).await?;
        let run = resources.assistant.create_run(&thread_id).await?;

        let response = RunStatusResponse {
            status: run.status.as_str().to_owned(),
            response: None,
            thread_id,
            run_id: run.id,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Create the run, poll it to a terminal state, and return the reply
    async fn run_sync(
        resources: &ServerResources,
        request: ChatProxyRequest,
    ) -> Result<Response, AppError> {
        let thread_id = Self::prepare_thread(resources, request).await?;
        let run = resources.assistant.create_run_and_poll(&thread_id).await?;

        if !matches!(run.status, crate::assistant::RunStatus::Completed) {
            return Err(AppError::upstream(format!(
                "Run failed with status: {}",
                run.status.as_str()
            )));
        }

        let reply = resources.assistant.latest_assistant_text(&thread_id).await?;
        let response = ChatReplyResponse {
            response: reply,
            thread_id,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_request_accepts_both_id_spellings() {
        let camel: ChatProxyRequest =
            serde_json::from_str(r#"{"message":"oi","threadId":"t1","runId":"r1"}"#).unwrap();
        assert_eq!(camel.thread_id.as_deref(), Some("t1"));
        assert_eq!(camel.run_id.as_deref(), Some("r1"));

        let snake: ChatProxyRequest =
            serde_json::from_str(r#"{"thread_id":"t2","run_id":"r2"}"#).unwrap();
        assert_eq!(snake.thread_id.as_deref(), Some("t2"));
        assert_eq!(snake.run_id.as_deref(), Some("r2"));
    }

    #[test]
    fn test_malformed_body_parses_as_empty_request() {
        let request: ChatProxyRequest =
            serde_json::from_slice(b"not json").unwrap_or_default();
        assert!(request.message.is_none());
        assert!(request.thread_id.is_none());
    }

    #[test]
    fn test_completed_status_response_includes_reply() {
        let response = RunStatusResponse {
            status: "completed".to_owned(),
            response: Some("Troque o óleo.".to_owned()),
            thread_id: "thread_1".to_owned(),
            run_id: "run_1".to_owned(),
        };
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["status"], "completed");
        assert_eq!(wire["response"], "Troque o óleo.");
        assert_eq!(wire["threadId"], "thread_1");
        assert_eq!(wire["runId"], "run_1");
    }

    #[test]
    fn test_pending_status_response_omits_reply_field() {
        let response = RunStatusResponse {
            status: "in_progress".to_owned(),
            response: None,
            thread_id: "thread_1".to_owned(),
            run_id: "run_1".to_owned(),
        };
        let wire = serde_json::to_value(&response).unwrap();
        assert!(wire.get("response").is_none());
    }
}

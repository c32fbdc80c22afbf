// ABOUTME: Checklist proxy route handler turning the travel form into an AI-generated checklist
// ABOUTME: Validates required fields, builds prompts, and parses the model's JSON reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! Checklist generation routes
//!
//! A single stateless handler: validate the form, build the deterministic
//! prompts, make one chat-completion call, extract the JSON payload from
//! the reply (models love wrapping JSON in markdown fences), and hand the
//! object back with `generated_by_ai: true` injected. The model's output
//! shape is not validated beyond the successful parse — the frontend
//! renders whatever the model produced.

use crate::constants::checklist;
use crate::errors::AppError;
use crate::llm::prompts::{build_system_prompt, build_user_prompt};
use crate::llm::{ChatMessage, ChatRequest};
use crate::middleware::cors::preflight;
use crate::models::TravelInput;
use crate::resources::ServerResources;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use regex::Regex;
use std::sync::Arc;
use std::sync::LazyLock;
use tracing::{error, info};

/// Fence with an explicit json language tag
#[allow(clippy::unwrap_used)] // literal pattern, exercised by tests
static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap());

/// Bare fence
#[allow(clippy::unwrap_used)] // literal pattern, exercised by tests
static BARE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\s*(.*?)\s*```").unwrap());

/// Checklist generation routes handler
pub struct ChecklistRoutes;

impl ChecklistRoutes {
    /// Create the checklist routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/travel-checklist",
                post(Self::generate_checklist).options(preflight),
            )
            .with_state(resources)
    }

    /// `POST /travel-checklist`
    async fn generate_checklist(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let input: TravelInput = serde_json::from_slice(&body)
            .map_err(|e| AppError::internal(format!("Invalid JSON body: {e}")))?;

        input.validate_required()?;

        info!(
            distance = input.distance,
            route_type = input.route_type.as_deref(),
            "Received travel checklist request"
        );

        let request = ChatRequest::new(vec![
            ChatMessage::system(build_system_prompt(&input)),
            ChatMessage::user(build_user_prompt(&input)),
        ])
        .with_model(resources.gateway.default_model())
        .with_temperature(checklist::GATEWAY_TEMPERATURE)
        .with_max_tokens(checklist::GATEWAY_MAX_TOKENS);

        let completion = resources.gateway.complete(&request).await?;

        let mut payload = extract_json_payload(&completion.content)?;
        payload.insert(
            "generated_by_ai".to_owned(),
            serde_json::Value::Bool(true),
        );

        info!(
            items = payload
                .get("checklist")
                .and_then(serde_json::Value::as_array)
                .map_or(0, Vec::len),
            "Returning generated checklist"
        );

        Ok((StatusCode::OK, Json(serde_json::Value::Object(payload))).into_response())
    }
}

/// Extract the JSON object from a model reply, strict-then-lenient
///
/// First a direct parse of the whole reply; if that fails, strip one
/// surrounding markdown fence (```` ```json ```` or a bare ```` ``` ````)
/// and retry once. Anything else is an upstream format error; the raw
/// content stays in the server log only.
fn extract_json_payload(
    content: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, AppError> {
    let direct = serde_json::from_str::<serde_json::Value>(content.trim());

    let parsed = direct.or_else(|_| {
        let fenced = JSON_FENCE
            .captures(content)
            .or_else(|| BARE_FENCE.captures(content))
            .and_then(|c| c.get(1))
            .map_or(content, |m| m.as_str());
        serde_json::from_str::<serde_json::Value>(fenced.trim())
    });

    match parsed {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => {
            error!("AI reply parsed as non-object JSON: {other}");
            Err(AppError::upstream_format("Falha ao processar resposta da IA"))
        }
        Err(e) => {
            error!("Failed to parse AI response as JSON ({e}): {content}");
            Err(AppError::upstream_format("Falha ao processar resposta da IA"))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_direct_json_parses() {
        let payload = extract_json_payload(r#"{"summary": "ok", "checklist": []}"#).unwrap();
        assert_eq!(payload["summary"], "ok");
    }

    #[test]
    fn test_json_fence_is_stripped() {
        let content = "```json\n{\"summary\": \"ok\"}\n```";
        let payload = extract_json_payload(content).unwrap();
        assert_eq!(payload["summary"], "ok");
    }

    #[test]
    fn test_bare_fence_is_stripped() {
        let content = "```\n{\"summary\": \"ok\"}\n```";
        let payload = extract_json_payload(content).unwrap();
        assert_eq!(payload["summary"], "ok");
    }

    #[test]
    fn test_fence_with_surrounding_prose_is_stripped() {
        let content = "Aqui está o checklist:\n```json\n{\"summary\": \"ok\"}\n```\nBoa viagem!";
        let payload = extract_json_payload(content).unwrap();
        assert_eq!(payload["summary"], "ok");
    }

    #[test]
    fn test_plain_text_is_a_format_error() {
        let err = extract_json_payload("Desculpe, não consegui gerar o checklist.").unwrap_err();
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.message, "Falha ao processar resposta da IA");
    }

    #[test]
    fn test_non_object_json_is_a_format_error() {
        let err = extract_json_payload("42").unwrap_err();
        assert_eq!(err.message, "Falha ao processar resposta da IA");
    }
}

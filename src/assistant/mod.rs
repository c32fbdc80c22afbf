// ABOUTME: Assistants API abstraction for thread-based AI conversations
// ABOUTME: Defines the wire types for threads, runs, and thread messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! # Assistants API Layer
//!
//! Wire types and client for the thread-based assistant upstream. The
//! upstream owns all conversation state; this layer only speaks its HTTP
//! contract: create a thread, append a message, create a run, poll the
//! run, and read the newest assistant reply out of the message list.
//!
//! ## Key Concepts
//!
//! - **Thread**: server-side conversation context, referenced by an
//!   opaque identifier the frontend persists between requests.
//! - **Run**: one execution of the assistant against a thread's
//!   accumulated messages, transitioning through states until a terminal
//!   outcome.

mod client;

pub use client::AssistantClient;

use serde::{Deserialize, Serialize};

// ============================================================================
// Wire Types
// ============================================================================

/// A conversation thread owned by the upstream service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Opaque thread identifier
    pub id: String,
}

/// One assistant invocation within a thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Opaque run identifier
    pub id: String,
    /// Current lifecycle state
    pub status: RunStatus,
}

/// Lifecycle states of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Waiting to start
    Queued,
    /// Executing
    InProgress,
    /// Waiting for tool output submission
    RequiresAction,
    /// Cancellation requested, not yet effective
    Cancelling,
    /// Cancelled before completion
    Cancelled,
    /// Execution failed
    Failed,
    /// Stopped before producing a complete reply
    Incomplete,
    /// Exceeded the upstream's execution window
    Expired,
    /// Finished successfully
    Completed,
}

impl RunStatus {
    /// Whether the run has reached a state it will not leave
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Queued | Self::InProgress | Self::Cancelling)
    }

    /// Wire representation of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Incomplete => "incomplete",
            Self::Expired => "expired",
            Self::Completed => "completed",
        }
    }
}

/// A message stored on a thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    /// Opaque message identifier
    pub id: String,
    /// Author role ("user" or "assistant")
    pub role: String,
    /// Ordered content blocks
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl ThreadMessage {
    /// Text of the first content block, when it is a text block
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentBlock::Text { text }) => Some(&text.value),
            _ => None,
        }
    }
}

/// One content block of a thread message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text content
    Text {
        /// The text payload
        text: TextContent,
    },
    /// Any block type this proxy does not consume (images, files)
    #[serde(other)]
    Unsupported,
}

/// Text payload of a content block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    /// The text value
    pub value: String,
}

/// Paginated message list as returned by the upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageList {
    /// Messages, newest first
    #[serde(default)]
    pub data: Vec<ThreadMessage>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!RunStatus::Queued.is_terminal());
        assert!(!RunStatus::InProgress.is_terminal());
        assert!(!RunStatus::Cancelling.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Expired.is_terminal());
        assert!(RunStatus::RequiresAction.is_terminal());
    }

    #[test]
    fn test_message_text_extraction() {
        let message: ThreadMessage = serde_json::from_value(serde_json::json!({
            "id": "msg_1",
            "role": "assistant",
            "content": [
                {"type": "text", "text": {"value": "Troque o óleo a cada 10.000 km."}}
            ]
        }))
        .unwrap();
        assert_eq!(
            message.first_text(),
            Some("Troque o óleo a cada 10.000 km.")
        );
    }

    #[test]
    fn test_non_text_first_block_yields_no_text() {
        let message: ThreadMessage = serde_json::from_value(serde_json::json!({
            "id": "msg_2",
            "role": "assistant",
            "content": [{"type": "image_file", "image_file": {"file_id": "file_1"}}]
        }))
        .unwrap();
        assert_eq!(message.first_text(), None);
    }

    #[test]
    fn test_run_status_wire_names() {
        let run: Run = serde_json::from_value(serde_json::json!({
            "id": "run_1",
            "status": "in_progress"
        }))
        .unwrap();
        assert_eq!(run.status, RunStatus::InProgress);
        assert_eq!(run.status.as_str(), "in_progress");
    }
}

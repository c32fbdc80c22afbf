// ABOUTME: Unified error handling with standard error codes and HTTP response mapping
// ABOUTME: Defines AppError, ErrorCode, and the JSON wire shape returned to clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! # Unified Error Handling System
//!
//! Centralized error handling for the Copiloto API server. Every failure a
//! handler can produce is an [`AppError`] carrying an [`ErrorCode`]; the
//! code determines the HTTP status and the message is what the client sees.
//!
//! The wire shape is deliberately flat — `{"error": "<message>"}` plus any
//! detail fields — because that is the contract the frontend consumes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,

    // External Services (5000-5999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5001,
    #[serde(rename = "EXTERNAL_CREDITS_EXHAUSTED")]
    ExternalCreditsExhausted = 5002,
    #[serde(rename = "UPSTREAM_FORMAT_ERROR")]
    UpstreamFormatError = 5003,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6000,
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6001,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    ///
    /// Upstream service failures map to 500 rather than a gateway status:
    /// the frontend contract treats every non-quota upstream problem as an
    /// internal failure of the proxy. Rate limits (429) and exhausted
    /// credits (402) pass through with their own statuses.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField => 400,
            Self::ExternalCreditsExhausted => 402,
            Self::ExternalRateLimited => 429,
            Self::ExternalServiceError
            | Self::UpstreamFormatError
            | Self::ConfigMissing
            | Self::ConfigInvalid
            | Self::InternalError => 500,
        }
    }

    /// Get a short description of this error class
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ExternalServiceError => "An external AI service encountered an error",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ExternalCreditsExhausted => "External service credits exhausted",
            Self::UpstreamFormatError => "The AI service returned an unprocessable response",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message, returned to the client verbatim
    pub message: String,
    /// Extra key-value fields merged into the JSON error body
    pub details: serde_json::Value,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
            source: None,
        }
    }

    /// Attach extra fields to the JSON error body
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required request fields are absent
    pub fn missing_fields(message: impl Into<String>, required: &[&str]) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
            .with_details(serde_json::json!({ "required": required }))
    }

    /// Upstream AI service failure (transport errors, non-quota API errors)
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalServiceError, message)
    }

    /// Upstream rate limit, passed through as 429
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalRateLimited, message)
    }

    /// Upstream credits exhausted, passed through as 402
    pub fn credits_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalCreditsExhausted, message)
    }

    /// AI output that could not be parsed into the expected shape
    pub fn upstream_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamFormatError, message)
    }

    /// Missing configuration (surfaced per request, never a crash)
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigMissing, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        Self::upstream(error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = ?self.code, "Request failed: {}", self.message);
        } else {
            warn!(code = ?self.code, "Request rejected: {}", self.message);
        }

        let mut body = serde_json::Map::new();
        body.insert("error".to_owned(), serde_json::Value::String(self.message));
        if let serde_json::Value::Object(extra) = self.details {
            body.extend(extra);
        }

        (status, Json(serde_json::Value::Object(body))).into_response()
    }
}

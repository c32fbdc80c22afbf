// ABOUTME: Route module organization for the Copiloto API HTTP endpoints
// ABOUTME: Provides route definitions organized by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! Route module for the Copiloto API server
//!
//! Each domain module contains only route definitions and thin handler
//! functions; upstream interaction lives in the client layers.

/// Chat proxy routes bridging the frontend to the assistant threads
pub mod chat;
/// Checklist generation routes
pub mod checklist;
/// Health check and system status routes
pub mod health;

/// Chat proxy route handlers
pub use chat::ChatRoutes;
/// Checklist route handlers
pub use checklist::ChecklistRoutes;
/// Health route handlers
pub use health::HealthRoutes;

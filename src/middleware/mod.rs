// ABOUTME: HTTP middleware for the Copiloto API server
// ABOUTME: Currently provides CORS response-header handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! HTTP middleware

/// CORS response headers and preflight handling
pub mod cors;

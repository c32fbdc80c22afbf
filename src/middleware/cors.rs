// ABOUTME: CORS response headers and preflight handling for the HTTP API
// ABOUTME: Appends permissive cross-origin headers to every response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! CORS handling for the API endpoints
//!
//! The contract the frontend was built against is intentionally blunt:
//! every response — success or error — carries
//! `Access-Control-Allow-Origin: *` and the allow-headers list, and an
//! `OPTIONS` request to an endpoint answers 200 with the literal body
//! `ok`. That is what the original edge runtime did by appending the
//! headers to each response by hand.
//!
//! Implemented as `tower-http` set-header layers plus explicit `OPTIONS`
//! route handlers, rather than a `CorsLayer`: a preflight-intercepting
//! layer would answer `OPTIONS` itself with an empty body and break the
//! `"ok"` contract.

use http::{header, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

/// Header list the frontend sends with its requests
const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Layer appending `Access-Control-Allow-Origin: *` to every response
pub fn allow_origin_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    )
}

/// Layer appending the permissive allow-headers list to every response
pub fn allow_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    )
}

/// Shared `OPTIONS` handler: 200 with the literal body `ok`
pub async fn preflight() -> &'static str {
    "ok"
}

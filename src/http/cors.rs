//! Permissive cross-origin headers for the browser-facing endpoints.
//!
//! Headers are set on every response of an endpoint, not only on preflight,
//! so the browser can read error bodies too.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, StatusCode};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

pub const BREACHES_METHODS: &str = "GET, OPTIONS";
pub const BREACHES_HEADERS: &str = "Content-Type, Authorization";
pub const SAFEBROWSING_METHODS: &str = "POST, OPTIONS";
pub const SAFEBROWSING_HEADERS: &str = "Content-Type";

/// Attach `Access-Control-Allow-*` headers to every route in `router`.
pub fn with_cors<S>(router: Router<S>, methods: &'static str, headers: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(methods),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(headers),
        ))
}

/// OPTIONS handler: 200 with an empty body.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

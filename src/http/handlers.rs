//! Endpoint handlers.

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::breaches::BreachVerdict;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::safebrowsing::SafetyVerdict;
use crate::upstream::ProxyResult;

#[derive(Debug, Deserialize)]
struct SafetyRequest {
    url: Option<String>,
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

/// `GET /api/breaches?email=...`
pub async fn lookup_breaches(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ProxyResult<BreachVerdict> {
    let start = Instant::now();
    let email = query.as_deref().and_then(|q| query_param(q, "email"));

    tracing::debug!(
        request_id = %headers.request_id(),
        provider = %state.breaches.provider(),
        "Breach lookup"
    );

    let result = state.breaches.lookup(email.as_deref()).await;
    let outcome = match &result {
        Ok(verdict) => verdict.outcome(),
        Err(e) => e.kind().as_str(),
    };
    metrics::record_lookup("breaches", outcome, start);

    tracing::info!(request_id = %headers.request_id(), outcome, "Breach lookup finished");
    result
}

/// `POST /api/safebrowsing` with `{"url": ...}`.
///
/// A missing or unparseable body reads as a missing `url`.
pub async fn check_url_safety(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ProxyResult<SafetyVerdict> {
    let start = Instant::now();
    let url = serde_json::from_slice::<SafetyRequest>(&body)
        .ok()
        .and_then(|req| req.url);

    tracing::debug!(request_id = %headers.request_id(), "URL safety check");

    let result = state.safety.check(url.as_deref()).await;
    let outcome = match &result {
        Ok(verdict) => verdict.outcome(),
        Err(e) => e.kind().as_str(),
    };
    metrics::record_lookup("safebrowsing", outcome, start);

    tracing::info!(request_id = %headers.request_id(), outcome, "URL safety check finished");
    result
}

/// `GET /health`
pub async fn health() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_decodes() {
        assert_eq!(
            query_param("email=me%2Btag%40example.com&x=1", "email").as_deref(),
            Some("me+tag@example.com")
        );
        assert_eq!(query_param("x=1", "email"), None);
        assert_eq!(query_param("email=", "email").as_deref(), Some(""));
    }

    #[test]
    fn test_first_duplicate_wins() {
        assert_eq!(
            query_param("email=a%40x.com&email=b%40x.com", "email").as_deref(),
            Some("a@x.com")
        );
    }
}

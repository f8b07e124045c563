//! Response rendering.
//!
//! # Responsibilities
//! - Render verdicts in the shapes the browser client expects
//! - Map every `ProxyError` to a status code and a JSON error object
//!
//! # Design Decisions
//! - Local failures (400/500) and upstream failures (502) are distinguishable
//! - Transport failures never leak detail, only a generic message
//! - Upstream text is only ever quoted as a bounded excerpt

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::breaches::{BreachVerdict, NOT_FOUND_SENTINEL};
use crate::safebrowsing::SafetyVerdict;
use crate::upstream::{ProxyError, UpstreamBody, NETWORK_FAILURE_MESSAGE};

pub fn status_for(error: &ProxyError) -> StatusCode {
    match error {
        ProxyError::MissingParameter(_) => StatusCode::BAD_REQUEST,
        ProxyError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        ProxyError::Configuration(_)
        | ProxyError::InvalidBody { .. }
        | ProxyError::Timeout(_)
        | ProxyError::Network(_)
        | ProxyError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let body = match &self {
            ProxyError::Upstream {
                body: UpstreamBody::Excerpt(text),
                ..
            } => json!({ "error": self.to_string(), "external_message": text }),
            ProxyError::Upstream {
                body: UpstreamBody::Json(details),
                ..
            } => json!({ "error": self.to_string(), "details": details }),
            ProxyError::InvalidBody { raw_response_start } => {
                json!({ "error": self.to_string(), "raw_response_start": raw_response_start })
            }
            ProxyError::Timeout(_) | ProxyError::Network(_) | ProxyError::Encode(_) => {
                json!({ "error": NETWORK_FAILURE_MESSAGE })
            }
            ProxyError::MissingParameter(_) | ProxyError::Configuration(_) => {
                json!({ "error": self.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for BreachVerdict {
    fn into_response(self) -> Response {
        let body = match self {
            BreachVerdict::Found { site_names } => json!({ "breaches": site_names }),
            BreachVerdict::NotFound => json!({ "Error": NOT_FOUND_SENTINEL }),
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

impl IntoResponse for SafetyVerdict {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ProxyError::MissingParameter("Missing email parameter")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ProxyError::Configuration("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&ProxyError::Upstream {
                status: 503,
                body: UpstreamBody::Excerpt("down".into())
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&ProxyError::InvalidBody {
                raw_response_start: "<".into()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&ProxyError::Timeout(10)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_timeout_renders_generic_message() {
        let response = ProxyError::Timeout(10).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

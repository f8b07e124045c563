//! Proxy error taxonomy.

use serde_json::Value;
use thiserror::Error;

/// Message shown to the browser for every transport-level failure.
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Proxy failed to execute the request or network error occurred.";

/// What the upstream said when it refused a request.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    /// Bounded excerpt of a raw text body.
    Excerpt(String),
    /// Small structured error document, passed through whole.
    Json(Value),
}

/// Coarse classification used for status codes, metrics and client messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientInput,
    Configuration,
    Upstream,
    Proxy,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ClientInput => "client_input",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Proxy => "proxy",
        }
    }
}

/// Every way a proxied lookup can fail.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Required client parameter absent or empty. Holds the full message.
    #[error("{0}")]
    MissingParameter(&'static str),

    /// Server-side setup is incomplete (e.g. credential not set).
    #[error("Configuration Error: {0}")]
    Configuration(&'static str),

    /// Upstream reachable but answered with a failure.
    #[error("External API returned status {status}.")]
    Upstream { status: u16, body: UpstreamBody },

    /// Upstream reported success but the body could not be parsed.
    #[error("Proxy received valid status but invalid JSON response.")]
    InvalidBody { raw_response_start: String },

    /// Upstream exchange exceeded its deadline.
    #[error("Upstream request timed out after {0}s")]
    Timeout(u64),

    /// Connection, DNS, TLS or body-read failure.
    #[error("Upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Outbound request body could not be encoded.
    #[error("Failed to encode upstream request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ProxyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::MissingParameter(_) => ErrorKind::ClientInput,
            ProxyError::Configuration(_) => ErrorKind::Configuration,
            ProxyError::Upstream { .. } => ErrorKind::Upstream,
            ProxyError::InvalidBody { .. }
            | ProxyError::Timeout(_)
            | ProxyError::Network(_)
            | ProxyError::Encode(_) => ErrorKind::Proxy,
        }
    }

    /// Upstream status, when the upstream answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ProxyError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for proxied lookups.
pub type ProxyResult<T> = Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ProxyError::MissingParameter("Missing email parameter").kind(),
            ErrorKind::ClientInput
        );
        assert_eq!(ProxyError::Configuration("x").kind(), ErrorKind::Configuration);
        assert_eq!(
            ProxyError::Upstream {
                status: 503,
                body: UpstreamBody::Excerpt(String::new())
            }
            .kind(),
            ErrorKind::Upstream
        );
        assert_eq!(
            ProxyError::InvalidBody {
                raw_response_start: "<html>".into()
            }
            .kind(),
            ErrorKind::Proxy
        );
        assert_eq!(ProxyError::Timeout(10).kind(), ErrorKind::Proxy);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ProxyError::MissingParameter("Missing email parameter").to_string(),
            "Missing email parameter"
        );
        assert_eq!(
            ProxyError::Upstream {
                status: 503,
                body: UpstreamBody::Excerpt("down".into())
            }
            .to_string(),
            "External API returned status 503."
        );
    }
}

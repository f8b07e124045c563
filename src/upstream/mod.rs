//! Upstream communication subsystem.
//!
//! # Data Flow
//! ```text
//! handler builds UpstreamRequest (provider-specific)
//!     → client.rs (single attempt, bounded deadline)
//!     → UpstreamResponse { status, raw text body }
//!     → handler interprets, or fails with ProxyError (error.rs)
//! ```
//!
//! # Design Decisions
//! - Bodies are captured as text first; parsing is the caller's job
//! - Anything quoted back from an upstream goes through `excerpt`

pub mod client;
pub mod error;

pub use client::{UpstreamClient, UpstreamRequest, UpstreamResponse};
pub use error::{ErrorKind, ProxyError, ProxyResult, UpstreamBody, NETWORK_FAILURE_MESSAGE};

/// Maximum characters of an upstream body quoted in logs or responses.
pub const MAX_EXCERPT_CHARS: usize = 500;

/// First `MAX_EXCERPT_CHARS` characters of `body`, cut on a char boundary.
pub fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_EXCERPT_CHARS) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_body_untouched() {
        assert_eq!(excerpt("service unavailable"), "service unavailable");
    }

    #[test]
    fn test_long_body_cut() {
        let body = "x".repeat(2_000);
        assert_eq!(excerpt(&body).chars().count(), MAX_EXCERPT_CHARS);
    }

    #[test]
    fn test_multibyte_boundary() {
        let body = "é".repeat(MAX_EXCERPT_CHARS + 3);
        let cut = excerpt(&body);
        assert_eq!(cut.chars().count(), MAX_EXCERPT_CHARS);
        assert!(cut.chars().all(|c| c == 'é'));
    }
}

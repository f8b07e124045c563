//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that every upstream URL is an absolute http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `timeouts.upstream_secs`).
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be > 0"));
    }

    for (field, value) in [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be > 0"));
        }
    }

    // The inbound deadline must outlast the upstream one, otherwise the browser
    // gets an empty 408 instead of the JSON error.
    if config.timeouts.upstream_secs > 0
        && config.timeouts.request_secs <= config.timeouts.upstream_secs
    {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!(
                "must be greater than timeouts.upstream_secs ({})",
                config.timeouts.upstream_secs
            ),
        ));
    }

    if let Err(message) = check_http_url(config.breaches.effective_base_url()) {
        errors.push(ValidationError::new("breaches.base_url", message));
    }
    if let Err(message) = check_http_url(&config.safebrowsing.api_url) {
        errors.push(ValidationError::new("safebrowsing.api_url", message));
    }

    if config.safebrowsing.client_id.trim().is_empty() {
        errors.push(ValidationError::new("safebrowsing.client_id", "must not be empty"));
    }
    if config.safebrowsing.client_version.trim().is_empty() {
        errors.push(ValidationError::new(
            "safebrowsing.client_version",
            "must not be empty",
        ));
    }
    if config.safebrowsing.api_key_env.trim().is_empty() {
        errors.push(ValidationError::new("safebrowsing.api_key_env", "must not be empty"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("'{}' is not a valid URL: {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

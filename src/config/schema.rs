//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::breaches::BreachProvider;

/// Root configuration for the trust-watch proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Outbound HTTP client settings shared by every upstream.
    pub upstream: UpstreamConfig,

    /// Breach lookup upstream and its provider policy.
    pub breaches: BreachesConfig,

    /// URL safety (threat matching) upstream.
    pub safebrowsing: SafeBrowsingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Maximum accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Deadline for one full upstream exchange (send + body read) in seconds.
    pub upstream_secs: u64,

    /// Inbound request timeout (total time to answer the browser) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 10,
            request_secs: 30,
        }
    }
}

/// Outbound client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// User-Agent sent to every upstream.
    pub user_agent: String,

    /// Honor HTTP(S)_PROXY environment variables for outbound calls.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("trust-watch-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
            system_proxy: true,
        }
    }
}

/// Breach lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BreachesConfig {
    /// Which upstream contract to speak. Chosen once; never auto-detected.
    pub provider: BreachProvider,

    /// Overrides the provider's default base URL.
    pub base_url: Option<String>,
}

impl BreachesConfig {
    /// Base URL actually used for requests.
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

/// Threat-matching upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SafeBrowsingConfig {
    /// threatMatches:find endpoint (without the key parameter).
    pub api_url: String,

    /// Client identity tag sent with every lookup.
    pub client_id: String,

    /// Client version sent with every lookup.
    pub client_version: String,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// Resolved at startup from `api_key_env`; never read from the file.
    #[serde(skip)]
    pub api_key: Option<ApiKey>,
}

impl Default for SafeBrowsingConfig {
    fn default() -> Self {
        Self {
            api_url: "https://safebrowsing.googleapis.com/v4/threatMatches:find".to_string(),
            client_id: "trust-watch-app".to_string(),
            client_version: "1.0.0".to_string(),
            api_key_env: "GOOGLE_SAFEBROWSING_API_KEY".to_string(),
            api_key: None,
        }
    }
}

/// Upstream credential. Debug output never contains the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key; blank values are treated as unset.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Raw key, for building the upstream query only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

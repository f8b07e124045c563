//! Configuration loading from disk and the process environment.

use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{ApiKey, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_BIND: &str = "TRUSTWATCH_BIND";
pub const ENV_BREACH_PROVIDER: &str = "TRUSTWATCH_BREACH_PROVIDER";
pub const ENV_BREACH_URL: &str = "TRUSTWATCH_BREACH_URL";
pub const ENV_SAFEBROWSING_URL: &str = "TRUSTWATCH_SAFEBROWSING_URL";
pub const ENV_LOG_LEVEL: &str = "TRUSTWATCH_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from the environment, and validate.
///
/// With no path the built-in defaults are the starting point.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_overrides(&mut config, |key| env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides and resolve the upstream credential.
///
/// `lookup` abstracts the environment so overrides can be exercised without
/// touching process-wide state.
pub fn apply_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(bind) = lookup(ENV_BIND) {
        config.listener.bind_address = bind;
    }
    if let Some(provider) = lookup(ENV_BREACH_PROVIDER) {
        config.breaches.provider = provider.parse().map_err(|message| ConfigError::Env {
            var: ENV_BREACH_PROVIDER,
            message,
        })?;
    }
    if let Some(url) = lookup(ENV_BREACH_URL) {
        config.breaches.base_url = Some(url);
    }
    if let Some(url) = lookup(ENV_SAFEBROWSING_URL) {
        config.safebrowsing.api_url = url;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }

    config.safebrowsing.api_key = lookup(&config.safebrowsing.api_key_env).and_then(ApiKey::new);

    Ok(())
}

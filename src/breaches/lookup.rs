//! Breach lookup handler logic.

use url::Url;

use crate::breaches::provider::BreachProvider;
use crate::breaches::types::BreachVerdict;
use crate::upstream::{ProxyError, ProxyResult, UpstreamBody, UpstreamClient};

pub const MISSING_EMAIL: &str = "Missing email parameter";

/// Forwards one email to the configured breach upstream and classifies the answer.
#[derive(Clone)]
pub struct BreachLookup {
    provider: BreachProvider,
    base_url: Url,
    client: UpstreamClient,
}

impl BreachLookup {
    pub fn new(provider: BreachProvider, base_url: Url, client: UpstreamClient) -> Self {
        Self {
            provider,
            base_url,
            client,
        }
    }

    pub fn provider(&self) -> BreachProvider {
        self.provider
    }

    /// Look up `email`. An absent or blank email fails before any network call.
    pub async fn lookup(&self, email: Option<&str>) -> ProxyResult<BreachVerdict> {
        let email = match email {
            Some(email) if !email.trim().is_empty() => email,
            _ => return Err(ProxyError::MissingParameter(MISSING_EMAIL)),
        };

        let request = self.provider.build_request(&self.base_url, email)?;
        let result = match self.client.execute(request).await {
            Ok(response) => self.provider.interpret(&response),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            self.log_failure(e);
        }
        result
    }

    fn log_failure(&self, error: &ProxyError) {
        match error {
            ProxyError::Upstream {
                status,
                body: UpstreamBody::Excerpt(excerpt),
            } => {
                tracing::warn!(
                    provider = %self.provider,
                    status = *status,
                    body_excerpt = %excerpt,
                    "Breach upstream returned an error"
                );
            }
            ProxyError::InvalidBody { raw_response_start } => {
                tracing::error!(
                    provider = %self.provider,
                    body_excerpt = %raw_response_start,
                    "Breach upstream sent a success status with an unparseable body"
                );
            }
            other => {
                tracing::error!(
                    provider = %self.provider,
                    error = %other,
                    "Breach upstream request failed"
                );
            }
        }
    }
}

//! URL safety handler logic.

use serde_json::Value;
use url::Url;

use crate::config::{ApiKey, SafeBrowsingConfig};
use crate::safebrowsing::types::{FindThreatMatchesRequest, FindThreatMatchesResponse, SafetyVerdict};
use crate::upstream::{
    excerpt, ProxyError, ProxyResult, UpstreamBody, UpstreamClient, UpstreamRequest, UpstreamResponse,
};

pub const MISSING_URL: &str = "Missing url parameter in request body.";
pub const MISSING_API_KEY: &str = "Safe Browsing API Key is missing.";

/// Checks one URL against the threat-matching upstream.
#[derive(Clone)]
pub struct SafetyChecker {
    api_url: Url,
    client_id: String,
    client_version: String,
    api_key: Option<ApiKey>,
    client: UpstreamClient,
}

impl SafetyChecker {
    pub fn new(api_url: Url, config: &SafeBrowsingConfig, client: UpstreamClient) -> Self {
        Self {
            api_url,
            client_id: config.client_id.clone(),
            client_version: config.client_version.clone(),
            api_key: config.api_key.clone(),
            client,
        }
    }

    /// Check `url`. Credential and input are verified before any network call.
    pub async fn check(&self, url: Option<&str>) -> ProxyResult<SafetyVerdict> {
        let Some(api_key) = &self.api_key else {
            tracing::error!("Safe Browsing API key is not configured");
            return Err(ProxyError::Configuration(MISSING_API_KEY));
        };

        let url = match url {
            Some(url) if !url.trim().is_empty() => url,
            _ => return Err(ProxyError::MissingParameter(MISSING_URL)),
        };

        let result = async {
            let request = self.build_request(api_key, url)?;
            let response = self.client.execute(request).await?;
            interpret(&response)
        }
        .await;

        if let Err(e) = &result {
            log_failure(e);
        }
        result
    }

    fn build_request(&self, api_key: &ApiKey, url: &str) -> ProxyResult<UpstreamRequest> {
        let mut endpoint = self.api_url.clone();
        endpoint.query_pairs_mut().append_pair("key", api_key.expose());

        let body = FindThreatMatchesRequest::new(&self.client_id, &self.client_version, url);
        Ok(UpstreamRequest::post_json(endpoint, &body)?)
    }
}

/// Classify a threat-matching answer.
///
/// Error bodies from this upstream are small JSON documents and are passed on
/// whole. A non-JSON error body is carried as a bounded string instead.
pub fn interpret(response: &UpstreamResponse) -> ProxyResult<SafetyVerdict> {
    let parsed = serde_json::from_str::<Value>(&response.body);

    if !response.is_success() {
        let details = parsed.unwrap_or_else(|_| Value::String(excerpt(&response.body)));
        return Err(ProxyError::Upstream {
            status: response.status,
            body: UpstreamBody::Json(details),
        });
    }

    let invalid = || ProxyError::InvalidBody {
        raw_response_start: excerpt(&response.body),
    };
    let document = parsed.map_err(|_| invalid())?;
    let found: FindThreatMatchesResponse = serde_json::from_value(document).map_err(|_| invalid())?;

    match found.matches {
        Some(matches) if !matches.is_empty() => Ok(SafetyVerdict::Dangerous { matches }),
        _ => Ok(SafetyVerdict::Safe),
    }
}

fn log_failure(error: &ProxyError) {
    match error {
        ProxyError::Upstream {
            status,
            body: UpstreamBody::Json(details),
        } => {
            tracing::warn!(
                status = *status,
                details = %excerpt(&details.to_string()),
                "Safe Browsing upstream returned an error"
            );
        }
        other => {
            tracing::error!(error = %other, "Safe Browsing request failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TimeoutConfig, UpstreamConfig};
    use crate::safebrowsing::types::ThreatType;
    use crate::upstream::ErrorKind;
    use serde_json::json;

    fn checker(api_key: Option<&str>) -> SafetyChecker {
        let config = SafeBrowsingConfig {
            api_key: api_key.and_then(ApiKey::new),
            ..SafeBrowsingConfig::default()
        };
        let client = UpstreamClient::new(&TimeoutConfig::default(), &UpstreamConfig::default()).unwrap();
        // Unroutable on purpose; these tests must never reach it.
        let api_url = Url::parse("http://127.0.0.1:9/v4/threatMatches:find").unwrap();
        SafetyChecker::new(api_url, &config, client)
    }

    #[test]
    fn test_single_match_is_dangerous() {
        let verdict = interpret(&UpstreamResponse::new(
            200,
            r#"{"matches":[{"threatType":"MALWARE","platformType":"ANY_PLATFORM"}]}"#,
        ))
        .unwrap();

        match verdict {
            SafetyVerdict::Dangerous { matches } => {
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].threat_type, ThreatType::Malware);
                assert_eq!(matches[0].platform_type, "ANY_PLATFORM");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_matches_keep_order_and_duplicates() {
        let verdict = interpret(&UpstreamResponse::new(
            200,
            r#"{"matches":[
                {"threatType":"UNWANTED_SOFTWARE","platformType":"WINDOWS"},
                {"threatType":"MALWARE","platformType":"ANY_PLATFORM","threat":{"url":"x"}},
                {"threatType":"UNWANTED_SOFTWARE","platformType":"WINDOWS"}
            ]}"#,
        ))
        .unwrap();

        let SafetyVerdict::Dangerous { matches } = verdict else {
            panic!("expected dangerous");
        };
        let types: Vec<_> = matches.iter().map(|m| m.threat_type).collect();
        assert_eq!(
            types,
            vec![ThreatType::UnwantedSoftware, ThreatType::Malware, ThreatType::UnwantedSoftware]
        );
        assert_eq!(matches[1].extra.get("threat"), Some(&json!({"url": "x"})));
    }

    #[test]
    fn test_empty_object_is_safe() {
        assert_eq!(
            interpret(&UpstreamResponse::new(200, "{}")).unwrap(),
            SafetyVerdict::Safe
        );
        assert_eq!(
            interpret(&UpstreamResponse::new(200, r#"{"matches":[]}"#)).unwrap(),
            SafetyVerdict::Safe
        );
    }

    #[test]
    fn test_null_matches_is_safe() {
        assert_eq!(
            interpret(&UpstreamResponse::new(200, r#"{"matches":null}"#)).unwrap(),
            SafetyVerdict::Safe
        );
    }

    #[test]
    fn test_error_status_passes_details_through() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let err = interpret(&UpstreamResponse::new(400, body)).unwrap_err();
        match err {
            ProxyError::Upstream {
                status: 400,
                body: UpstreamBody::Json(details),
            } => assert_eq!(details["error"]["status"], "INVALID_ARGUMENT"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_json_error_status_still_upstream() {
        let err = interpret(&UpstreamResponse::new(503, "<html>busy</html>")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_non_json_success_is_invalid_body() {
        let err = interpret(&UpstreamResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ProxyError::InvalidBody { .. }));
    }

    #[test]
    fn test_unrequested_threat_type_is_invalid_body() {
        let err = interpret(&UpstreamResponse::new(
            200,
            r#"{"matches":[{"threatType":"POTENTIALLY_HARMFUL_APPLICATION","platformType":"ANDROID"}]}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ProxyError::InvalidBody { .. }));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_input_check() {
        let err = checker(None).check(None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Configuration Error: Safe Browsing API Key is missing.");
    }

    #[tokio::test]
    async fn test_blank_url_is_client_input() {
        let err = checker(Some("k")).check(Some("  ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ClientInput);
        assert_eq!(err.to_string(), MISSING_URL);
    }

    #[test]
    fn test_request_carries_key_and_body() {
        let checker = checker(Some("k-1"));
        let key = ApiKey::new("k-1").unwrap();
        let request = checker.build_request(&key, "http://bad.test/").unwrap();

        assert_eq!(request.method, reqwest::Method::POST);
        assert_eq!(request.url.query(), Some("key=k-1"));
        let body = request.body.unwrap();
        assert_eq!(body["threatInfo"]["threatEntries"][0]["url"], "http://bad.test/");
        assert_eq!(body["client"]["clientId"], "trust-watch-app");
    }
}

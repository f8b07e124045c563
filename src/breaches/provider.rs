//! Breach upstream provider policies.
//!
//! The known breach upstreams disagree on how they encode "no match" and on
//! where the email goes in the request. Each contract is one variant here,
//! chosen by configuration. Responses are never used to guess the provider.

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::breaches::types::{BreachVerdict, NOT_FOUND_SENTINEL};
use crate::upstream::{excerpt, ProxyError, ProxyResult, UpstreamBody, UpstreamRequest, UpstreamResponse};

const XPOSED_SEARCH_URL: &str = "https://exposedornot.com/api/v1/search";
const XPOSED_CHECK_EMAIL_URL: &str = "https://api.xposedornot.com/v1/check-email";

/// Upstream contract for breach lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreachProvider {
    /// Email appended to the path. Only the sentinel object or an explicit
    /// empty list means "not found"; any other shape is an upstream fault.
    #[default]
    XposedPath,
    /// Email appended to the path. Sentinel, absent or empty `breaches`
    /// all mean "not found".
    XposedBreaches,
    /// Email passed as `?email=`. Classified like `XposedBreaches`; a 404 is
    /// a real error.
    XposedQuery,
    /// Email appended to the path. HTTP 404 itself means "not found".
    AnonymousStatus,
}

impl BreachProvider {
    pub const ALL: [BreachProvider; 4] = [
        BreachProvider::XposedPath,
        BreachProvider::XposedBreaches,
        BreachProvider::XposedQuery,
        BreachProvider::AnonymousStatus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BreachProvider::XposedPath => "xposed-path",
            BreachProvider::XposedBreaches => "xposed-breaches",
            BreachProvider::XposedQuery => "xposed-query",
            BreachProvider::AnonymousStatus => "anonymous-status",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            BreachProvider::AnonymousStatus => XPOSED_CHECK_EMAIL_URL,
            _ => XPOSED_SEARCH_URL,
        }
    }

    /// Build the single upstream request for `email`.
    pub fn build_request(&self, base: &Url, email: &str) -> ProxyResult<UpstreamRequest> {
        let mut url = base.clone();
        match self {
            BreachProvider::XposedQuery => {
                url.query_pairs_mut().append_pair("email", email);
            }
            _ => {
                url.path_segments_mut()
                    .map_err(|_| ProxyError::Configuration("breach lookup base URL cannot take a path"))?
                    .pop_if_empty()
                    .push(email);
            }
        }

        Ok(UpstreamRequest::get(url).header(ACCEPT, "application/json"))
    }

    /// Classify an upstream answer.
    pub fn interpret(&self, response: &UpstreamResponse) -> ProxyResult<BreachVerdict> {
        if *self == BreachProvider::AnonymousStatus && response.status == 404 {
            return Ok(BreachVerdict::NotFound);
        }

        if !response.is_success() {
            return Err(upstream_fault(response));
        }

        let document: Value =
            serde_json::from_str(&response.body).map_err(|_| ProxyError::InvalidBody {
                raw_response_start: excerpt(&response.body),
            })?;

        if is_sentinel(&document) {
            return Ok(BreachVerdict::NotFound);
        }

        match (self, site_names(&document)) {
            (_, Some(site_names)) if !site_names.is_empty() => {
                Ok(BreachVerdict::Found { site_names })
            }
            (BreachProvider::XposedPath, None) => Err(upstream_fault(response)),
            _ => Ok(BreachVerdict::NotFound),
        }
    }
}

impl fmt::Display for BreachProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BreachProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BreachProvider::ALL
            .into_iter()
            .find(|p| p.name() == s.trim())
            .ok_or_else(|| {
                let known: Vec<_> = BreachProvider::ALL.iter().map(|p| p.name()).collect();
                format!("unknown breach provider '{}' (expected one of {})", s, known.join(", "))
            })
    }
}

fn upstream_fault(response: &UpstreamResponse) -> ProxyError {
    ProxyError::Upstream {
        status: response.status,
        body: UpstreamBody::Excerpt(excerpt(&response.body)),
    }
}

fn is_sentinel(document: &Value) -> bool {
    document.get("Error").and_then(Value::as_str) == Some(NOT_FOUND_SENTINEL)
}

/// Names from a `breaches` field, or from a top-level list.
///
/// `None` when neither is present. Accepts flat strings, nested lists of
/// strings and objects carrying `Name`/`name`.
fn site_names(document: &Value) -> Option<Vec<String>> {
    let list = match document {
        Value::Array(_) => document,
        _ => document.get("breaches").filter(|v| v.is_array())?,
    };

    let mut names = Vec::new();
    collect_names(list, &mut names);
    Some(names)
}

fn collect_names(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(name) => out.push(name.clone()),
        Value::Array(items) => items.iter().for_each(|item| collect_names(item, out)),
        Value::Object(fields) => {
            if let Some(name) = fields
                .get("Name")
                .or_else(|| fields.get("name"))
                .and_then(Value::as_str)
            {
                out.push(name.to_string());
            }
        }
        _ => {}
    }
}

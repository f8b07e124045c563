//! Threat-matching wire types and result classification.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Threat categories every lookup asks about.
pub const REQUESTED_THREAT_TYPES: [ThreatType; 3] = [
    ThreatType::Malware,
    ThreatType::SocialEngineering,
    ThreatType::UnwantedSoftware,
];

pub const PLATFORM_ANY: &str = "ANY_PLATFORM";
pub const ENTRY_TYPE_URL: &str = "URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatType {
    Malware,
    SocialEngineering,
    UnwantedSoftware,
}

/// One upstream classification of the checked URL.
///
/// Fields other than the threat and platform type are kept verbatim so the
/// browser sees everything the upstream reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatch {
    pub threat_type: ThreatType,
    pub platform_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Classification of a successful safety check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyVerdict {
    Safe,
    /// Matches keep upstream order; duplicates are not removed.
    Dangerous { matches: Vec<ThreatMatch> },
}

impl SafetyVerdict {
    pub fn outcome(&self) -> &'static str {
        match self {
            SafetyVerdict::Safe => "safe",
            SafetyVerdict::Dangerous { .. } => "dangerous",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindThreatMatchesRequest<'a> {
    pub client: ClientInfo<'a>,
    pub threat_info: ThreatInfo<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo<'a> {
    pub client_id: &'a str,
    pub client_version: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatInfo<'a> {
    pub threat_types: [ThreatType; 3],
    pub platform_types: [&'static str; 1],
    pub threat_entry_types: [&'static str; 1],
    pub threat_entries: [ThreatEntry<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct ThreatEntry<'a> {
    pub url: &'a str,
}

impl<'a> FindThreatMatchesRequest<'a> {
    pub fn new(client_id: &'a str, client_version: &'a str, url: &'a str) -> Self {
        Self {
            client: ClientInfo {
                client_id,
                client_version,
            },
            threat_info: ThreatInfo {
                threat_types: REQUESTED_THREAT_TYPES,
                platform_types: [PLATFORM_ANY],
                threat_entry_types: [ENTRY_TYPE_URL],
                threat_entries: [ThreatEntry { url }],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FindThreatMatchesResponse {
    /// Absent, `null` and `[]` all mean no match.
    #[serde(default)]
    pub matches: Option<Vec<ThreatMatch>>,
}

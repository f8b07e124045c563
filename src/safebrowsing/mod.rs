//! URL safety proxy.
//!
//! # Data Flow
//! ```text
//! {"url": ...} (POST body)
//!     → checker.rs (credential check, input check, single POST upstream)
//!     → types.rs (fixed threat policy, wire shapes)
//!     → SafetyVerdict or ProxyError
//! ```
//!
//! # Design Decisions
//! - Threat categories, platform and entry type are fixed, never caller-supplied
//! - The credential is appended to the upstream URL and never logged

pub mod checker;
pub mod types;

pub use checker::{SafetyChecker, MISSING_API_KEY, MISSING_URL};
pub use types::{SafetyVerdict, ThreatMatch, ThreatType};

//! Breach lookup proxy.
//!
//! # Data Flow
//! ```text
//! email (query parameter)
//!     → lookup.rs (precondition, single upstream call)
//!     → provider.rs (build request, interpret status + body)
//!     → BreachVerdict or ProxyError
//! ```

pub mod lookup;
pub mod provider;
pub mod types;

pub use lookup::{BreachLookup, MISSING_EMAIL};
pub use provider::BreachProvider;
pub use types::{BreachVerdict, NOT_FOUND_SENTINEL};

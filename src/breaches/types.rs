//! Breach lookup result types.

/// Literal body some breach upstreams return with a 200 to mean "no match".
pub const NOT_FOUND_SENTINEL: &str = "No se ha encontrado";

/// Classification of a successful breach lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreachVerdict {
    /// Email appears in at least one breach. Names keep upstream order.
    Found { site_names: Vec<String> },
    /// Upstream explicitly reports no match.
    NotFound,
}

impl BreachVerdict {
    pub fn outcome(&self) -> &'static str {
        match self {
            BreachVerdict::Found { .. } => "found",
            BreachVerdict::NotFound => "not_found",
        }
    }
}

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (lookup counters and latency histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows into every handler log event
//! - Upstream bodies only ever appear as bounded excerpts

pub mod logging;
pub mod metrics;

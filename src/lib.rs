//! Trust-watch proxy library.
//!
//! Stateless proxy handlers that forward a browser's breach lookup or URL
//! safety check to one third-party upstream and normalize the answer.

pub mod breaches;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod safebrowsing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

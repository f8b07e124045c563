//! Trust-watch proxy server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser                 ┌──────────────────────── PROXY ─────────────────────────┐
//!   ────────────────────────┼─▶ http (CORS, request id) ─▶ breaches  ─┐              │
//!   GET  /api/breaches      │                            safebrowsing ├─▶ upstream ──┼──▶ Third-party
//!   POST /api/safebrowsing  │                                         │   client     │     API
//!   ◀───────────────────────┼── response (JSON contract) ◀────────────┘              │
//!                           │                                                        │
//!                           │   config · observability · lifecycle                   │
//!                           └────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use trust_watch_proxy::config::load_config;
use trust_watch_proxy::lifecycle;
use trust_watch_proxy::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "trust-watch-proxy", version)]
#[command(about = "Breach lookup and URL safety proxy", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "TRUSTWATCH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    init_logging(&config.observability);

    tracing::info!("trust-watch-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        breach_provider = %config.breaches.provider,
        breach_url = %config.breaches.effective_base_url(),
        upstream_timeout_secs = config.timeouts.upstream_secs,
        safebrowsing_key_present = config.safebrowsing.api_key.is_some(),
        "Configuration loaded"
    );
    if config.safebrowsing.api_key.is_none() {
        tracing::warn!(
            variable = %config.safebrowsing.api_key_env,
            "Safe Browsing API key not set; /api/safebrowsing will answer with a configuration error"
        );
    }

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

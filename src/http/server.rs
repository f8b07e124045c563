//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID, CORS)
//! - Build the shared upstream client and the two proxy handlers
//! - Bind server to listener and drain on shutdown

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::breaches::BreachLookup;
use crate::config::ProxyConfig;
use crate::http::cors::{
    preflight, with_cors, BREACHES_HEADERS, BREACHES_METHODS, SAFEBROWSING_HEADERS,
    SAFEBROWSING_METHODS,
};
use crate::http::handlers::{check_url_safety, health, lookup_breaches};
use crate::http::request::UuidRequestId;
use crate::lifecycle::startup::StartupError;
use crate::safebrowsing::SafetyChecker;
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub breaches: Arc<BreachLookup>,
    pub safety: Arc<SafetyChecker>,
}

impl AppState {
    /// Build both handlers around one shared upstream client.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, StartupError> {
        let client = UpstreamClient::new(&config.timeouts, &config.upstream)?;

        let breach_url = parse_url("breaches.base_url", config.breaches.effective_base_url())?;
        let safety_url = parse_url("safebrowsing.api_url", &config.safebrowsing.api_url)?;

        Ok(Self {
            breaches: Arc::new(BreachLookup::new(
                config.breaches.provider,
                breach_url,
                client.clone(),
            )),
            safety: Arc::new(SafetyChecker::new(safety_url, &config.safebrowsing, client)),
        })
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, StartupError> {
    Url::parse(raw).map_err(|e| StartupError::InvalidUrl {
        field,
        message: e.to_string(),
    })
}

/// HTTP server for the trust-watch proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, StartupError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let breaches = with_cors(
            Router::<AppState>::new().route("/api/breaches", get(lookup_breaches).options(preflight)),
            BREACHES_METHODS,
            BREACHES_HEADERS,
        );
        let safebrowsing = with_cors(
            Router::<AppState>::new().route(
                "/api/safebrowsing",
                post(check_url_safety).options(preflight),
            ),
            SAFEBROWSING_METHODS,
            SAFEBROWSING_HEADERS,
        );

        Router::new()
            .merge(breaches)
            .merge(safebrowsing)
            .route("/health", get(health))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            breach_provider = %self.config.breaches.provider,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

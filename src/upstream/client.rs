//! Shared outbound HTTP client.
//!
//! # Responsibilities
//! - Send one request per lookup, no retries
//! - Read the body as text before anyone tries to parse it
//! - Bound the whole exchange with a deadline
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; timeouts are distinct from other errors
//! - One `reqwest::Client` is built at startup and cloned into every handler

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::upstream::error::{ProxyError, ProxyResult};

/// One outbound call, built fresh per lookup.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl UpstreamRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn post_json<T: Serialize>(url: Url, body: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            method: Method::POST,
            url,
            headers: HeaderMap::new(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn header(mut self, name: reqwest::header::HeaderName, value: &'static str) -> Self {
        self.headers
            .insert(name, reqwest::header::HeaderValue::from_static(value));
        self
    }
}

/// Status and raw text body of an upstream answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound client with a per-exchange deadline.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    deadline: Duration,
}

impl UpstreamClient {
    /// Build the shared client.
    pub fn new(timeouts: &TimeoutConfig, upstream: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .user_agent(upstream.user_agent.clone());
        if !upstream.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            http: builder.build()?,
            deadline: Duration::from_secs(timeouts.upstream_secs),
        })
    }

    /// Perform exactly one exchange.
    pub async fn execute(&self, request: UpstreamRequest) -> ProxyResult<UpstreamResponse> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(UpstreamResponse { status, body })
        };

        // The request URL can carry credentials or the looked-up address.
        match timeout(self.deadline, exchange).await {
            Ok(result) => result.map_err(|e| ProxyError::Network(e.without_url())),
            Err(_) => Err(ProxyError::Timeout(self.deadline.as_secs())),
        }
    }
}

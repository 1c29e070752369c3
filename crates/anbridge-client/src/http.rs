//! Outbound submission dispatch.
//!
//! The dispatcher performs exactly one POST per call. It does not retry and
//! does not interpret the upstream status: any response that arrives is handed
//! back as `(status, body)`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use anbridge_common::{DEFAULT_SUBMISSION_TIMEOUT_SECS, OSDI_API_TOKEN_HEADER};

use crate::{error::TransportError, model::SubmissionPayload};

/// Configuration for the HTTP dispatcher
#[derive(Clone, Debug)]
pub struct HttpDispatcherConfig {
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// User agent sent with every submission
    pub user_agent: String,
}

impl Default for HttpDispatcherConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5000,
            user_agent: format!("anbridge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpDispatcherConfig {
    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, connect_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self
    }
}

/// A fully resolved outbound call
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub timeout: Duration,
}

impl OutboundRequest {
    /// Build the JSON submission call for `url`, authenticated with `api_key`.
    pub fn submission(
        url: &str,
        api_key: &str,
        payload: &SubmissionPayload,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            url: url.to_string(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                (OSDI_API_TOKEN_HEADER.to_string(), api_key.to_string()),
            ],
            body: serde_json::to_string(payload)?,
            timeout,
        })
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl Default for OutboundRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            headers: Vec::new(),
            body: String::new(),
            timeout: Duration::from_secs(DEFAULT_SUBMISSION_TIMEOUT_SECS),
        }
    }
}

/// Whatever the upstream answered, successful or not
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a resolved submission to the external CRM.
#[async_trait]
pub trait SubmissionDispatcher: Send + Sync {
    async fn post(&self, request: OutboundRequest) -> Result<UpstreamResponse, TransportError>;
}

/// `reqwest`-backed dispatcher
pub struct HttpDispatcher {
    client: Client,
}

impl HttpDispatcher {
    /// Create a new dispatcher
    pub fn new(config: HttpDispatcherConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SubmissionDispatcher for HttpDispatcher {
    async fn post(&self, request: OutboundRequest) -> Result<UpstreamResponse, TransportError> {
        debug!(url = %request.url, "Dispatching submission");

        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout)
            .body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(request.timeout.as_millis() as u64)
            } else {
                TransportError::Http(e)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, "Upstream responded");

        Ok(UpstreamResponse { status, body })
    }
}

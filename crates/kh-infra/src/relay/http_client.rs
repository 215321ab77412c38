use std::time::Duration;

use async_trait::async_trait;
use kh_core::auth::{AuthenticatedRequest, HttpMethod};
use kh_core::ports::{RelayError, RelayPort, RelayResponse};
use reqwest::Method;
use tracing::debug;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest transport for signed relay requests
///
/// Sends exactly what it is given and returns the status and body; it never
/// retries and never interprets status codes.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    client: reqwest::Client,
}

impl HttpRelayClient {
    pub fn new() -> Result<Self, RelayError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Transport(format!("failed to build http client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RelayPort for HttpRelayClient {
    async fn send(&self, request: AuthenticatedRequest) -> Result<RelayResponse, RelayError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        debug!(method = %request.method, path = %request.url.path(), "sending relay request");

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        debug!(status, "relay responded");
        Ok(RelayResponse::new(status, body.to_vec()))
    }
}

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use url::Url;

use crate::crypto::{AsymmetricKey, KeyError};
use crate::encoding::base64_encode;

pub const TIMESTAMP_HEADER: &str = "X-Censo-Timestamp";
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const DEVICE_PUBLIC_KEY_HEADER: &str = "X-Censo-Device-Public-Key";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The request is never sent unsigned.
    #[error("failed to sign relay request: {0}")]
    Signing(#[from] KeyError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relay request ready for the transport: URL, body and auth headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub body: Option<Vec<u8>>,
    pub headers: Vec<(&'static str, String)>,
}

impl AuthenticatedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// ISO-8601 UTC with second precision, e.g. `2024-01-02T03:04:05Z`.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `method ‖ path ‖ base64(body) ‖ timestamp`, concatenated without separators.
pub fn canonical_string(
    method: HttpMethod,
    path: &str,
    body: Option<&[u8]>,
    timestamp: &str,
) -> String {
    let body_digest_text = body.map(base64_encode).unwrap_or_default();
    format!("{}{}{}{}", method.as_str(), path, body_digest_text, timestamp)
}

/// Signs outgoing relay requests with the session's auth key.
pub struct RequestAuthenticator {
    auth_key: AsymmetricKey,
}

impl RequestAuthenticator {
    pub fn new(auth_key: AsymmetricKey) -> Self {
        Self { auth_key }
    }

    /// Build the signed request.
    ///
    /// The signed path is the full URL path, so a prefix carried by the relay
    /// base URL is covered by the signature.
    pub fn authenticate(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<Vec<u8>>,
        timestamp: DateTime<Utc>,
    ) -> Result<AuthenticatedRequest, AuthError> {
        let timestamp = format_timestamp(timestamp);
        let canonical = canonical_string(method, url.path(), body.as_deref(), &timestamp);
        let signature = self.auth_key.sign(canonical.as_bytes())?;

        let mut headers = vec![
            (TIMESTAMP_HEADER, timestamp),
            (
                AUTHORIZATION_HEADER,
                format!("signature {}", base64_encode(&signature)),
            ),
            (
                DEVICE_PUBLIC_KEY_HEADER,
                self.auth_key.public_key_base58().as_str().to_string(),
            ),
        ];
        if body.is_some() {
            headers.push((CONTENT_TYPE_HEADER, "application/json".to_string()));
        }

        Ok(AuthenticatedRequest {
            method,
            url,
            body,
            headers,
        })
    }
}

//! Relay port - abstracts the HTTP relay the two devices meet on
//!
//! Requests arrive already signed; the adapter only moves bytes and reports
//! the status code. Status interpretation stays in the session.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::AuthenticatedRequest;

const MAINTENANCE_STATUS: u16 = 418;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// No HTTP response was obtained
    #[error("relay transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RelayResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 418: relay temporarily unavailable, keep polling
    pub fn is_maintenance(&self) -> bool {
        self.status == MAINTENANCE_STATUS
    }
}

#[async_trait]
pub trait RelayPort: Send + Sync {
    async fn send(&self, request: AuthenticatedRequest) -> Result<RelayResponse, RelayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(RelayResponse::new(200, Vec::new()).is_success());
        assert!(RelayResponse::new(204, Vec::new()).is_success());
        assert!(!RelayResponse::new(300, Vec::new()).is_success());
        assert!(!RelayResponse::new(418, Vec::new()).is_success());
        assert!(RelayResponse::new(418, Vec::new()).is_maintenance());
        assert!(!RelayResponse::new(500, Vec::new()).is_maintenance());
    }
}

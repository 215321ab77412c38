//! # kh-core
//!
//! Core domain models and protocol logic for keyhandoff.
//!
//! This crate contains pure protocol logic without any infrastructure dependencies:
//! key handling, text encodings, request authentication, deep links and the
//! relay import state. Network and clock access go through [`ports`].

// Public module exports
pub mod auth;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod ids;
pub mod import;
pub mod link;
pub mod ports;

// Re-export commonly used types at the crate root
pub use auth::{AuthError, AuthenticatedRequest, HttpMethod, RequestAuthenticator};
pub use config::{ConfigError, KeyHandoffConfig, PollingPolicy, RelayConfig};
pub use crypto::{AsymmetricKey, KeyError};
pub use encoding::{Base58EncodedPublicKey, Base64EncodedString, EncodingError};
pub use ids::ChannelId;
pub use import::{
    EncryptedPhrase, ExportedPhrase, GetImportDataApiResponse, ImportDecision, ImportState,
    ImportStateError, WordListLanguage,
};
pub use link::{DeepLink, LinkError};
pub use ports::{ClockPort, RelayError, RelayPort, RelayResponse};

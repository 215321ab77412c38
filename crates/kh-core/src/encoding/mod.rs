//! Text encodings for keys and binary payloads
//!
//! - **Base58** (Bitcoin alphabet): public keys shown to humans and sent in headers
//! - **Base64** (standard, padded): binary payloads in JSON bodies
//! - **URL-safe Base64** (`-`, `_`, no padding): values embedded in deep-link URIs
//!
//! The wrapper types carry the text form and the decoded bytes together and can
//! only be built through validating constructors.

mod base58;
mod base64;

pub use self::base58::{base58_decode, base58_encode, Base58EncodedPublicKey};
pub use self::base64::{
    base64_decode, base64_encode, url_safe_decode, url_safe_encode, Base64EncodedString,
};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("invalid base64: {0}")]
    InvalidBase64(String),
}

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{Display, Formatter};

use crate::crypto::AsymmetricKey;
use crate::encoding::url_safe_encode;

/// Relay-visible name of a pairing channel
/// Format: URL-safe base64 (no padding) of SHA-256(channel public key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn from_public_key(channel_key: &AsymmetricKey) -> Self {
        Self::from_public_representation(&channel_key.public_representation())
    }

    pub fn from_public_representation(bytes: &[u8]) -> Self {
        Self(url_safe_encode(&Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ChannelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

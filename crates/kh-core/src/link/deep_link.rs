use std::fmt;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::RelayConfig;
use crate::crypto::{AsymmetricKey, KeyError};
use crate::encoding::{url_safe_decode, url_safe_encode, Base58EncodedPublicKey, EncodingError};

const LINK_HOST: &str = "import";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("malformed deep link: {0}")]
    Malformed(String),

    #[error("deep link name is not valid UTF-8")]
    InvalidName,

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Pairing invitation.
///
/// ```text
/// {scheme}://import/{version}/{base58 channel key}/{epoch millis}/{signature}/{name}
/// ```
///
/// Signature and name are URL-safe base64 without padding. The signed message
/// is the decimal text of the timestamp followed by SHA-256 of the name bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    scheme: String,
    version: String,
    channel_public_key: Base58EncodedPublicKey,
    created_at_ms: i64,
    signature: Vec<u8>,
    name: String,
}

impl DeepLink {
    /// Build and sign a link with the channel key.
    pub fn create(
        config: &RelayConfig,
        channel_key: &AsymmetricKey,
        name: &str,
        created_at_ms: i64,
    ) -> Result<Self, LinkError> {
        let signature = channel_key.sign(&signed_message(created_at_ms, name))?;
        Ok(Self {
            scheme: config.link_scheme.clone(),
            version: config.link_version.clone(),
            channel_public_key: channel_key.public_key_base58(),
            created_at_ms,
            signature,
            name: name.to_string(),
        })
    }

    /// Parse a link produced by [`DeepLink::to_uri`].
    ///
    /// Parsing only checks structure and encodings; call [`DeepLink::verify`]
    /// before trusting the content.
    pub fn parse(uri: &str) -> Result<Self, LinkError> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| LinkError::Malformed("missing scheme".to_string()))?;
        if scheme.is_empty() {
            return Err(LinkError::Malformed("empty scheme".to_string()));
        }

        let segments: Vec<&str> = rest.split('/').collect();
        let [host, version, key, millis, signature, name] = segments.as_slice() else {
            return Err(LinkError::Malformed(format!(
                "expected 6 path segments, got {}",
                segments.len()
            )));
        };
        if *host != LINK_HOST {
            return Err(LinkError::Malformed(format!("unexpected host '{}'", host)));
        }
        if version.is_empty() {
            return Err(LinkError::Malformed("empty version".to_string()));
        }

        let channel_public_key = Base58EncodedPublicKey::parse(*key)?;
        let created_at_ms = millis
            .parse::<i64>()
            .map_err(|_| LinkError::Malformed(format!("invalid timestamp '{}'", millis)))?;
        let signature = url_safe_decode(signature)?;
        let name = String::from_utf8(url_safe_decode(name)?).map_err(|_| LinkError::InvalidName)?;

        Ok(Self {
            scheme: scheme.to_string(),
            version: version.to_string(),
            channel_public_key,
            created_at_ms,
            signature,
            name,
        })
    }

    /// Check the embedded signature against the embedded channel key.
    pub fn verify(&self) -> bool {
        let Ok(key) = AsymmetricKey::from_public_representation(self.channel_public_key.as_bytes())
        else {
            return false;
        };
        key.verify(&signed_message(self.created_at_ms, &self.name), &self.signature)
    }

    pub fn to_uri(&self) -> String {
        format!(
            "{}://{}/{}/{}/{}/{}/{}",
            self.scheme,
            LINK_HOST,
            self.version,
            self.channel_public_key,
            self.created_at_ms,
            url_safe_encode(&self.signature),
            url_safe_encode(self.name.as_bytes())
        )
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn channel_public_key(&self) -> &Base58EncodedPublicKey {
        &self.channel_public_key
    }

    pub fn created_at_ms(&self) -> i64 {
        self.created_at_ms
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

fn signed_message(created_at_ms: i64, name: &str) -> Vec<u8> {
    let mut message = created_at_ms.to_string().into_bytes();
    message.extend_from_slice(&Sha256::digest(name.as_bytes()));
    message
}

use std::fmt;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::EncodingError;

pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn base64_decode(text: &str) -> Result<Vec<u8>, EncodingError> {
    STANDARD
        .decode(text)
        .map_err(|e| EncodingError::InvalidBase64(e.to_string()))
}

/// URL-safe alphabet without padding, for values embedded in URIs.
pub fn url_safe_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn url_safe_decode(text: &str) -> Result<Vec<u8>, EncodingError> {
    URL_SAFE_NO_PAD
        .decode(text)
        .map_err(|e| EncodingError::InvalidBase64(e.to_string()))
}

/// Standard base64 text together with its decoded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Base64EncodedString {
    value: String,
    data: Vec<u8>,
}

impl Base64EncodedString {
    pub fn parse(value: impl Into<String>) -> Result<Self, EncodingError> {
        let value = value.into();
        let data = base64_decode(&value)?;
        Ok(Self { value, data })
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            value: base64_encode(&data),
            data,
        }
    }

    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Base64EncodedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Base64EncodedString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for Base64EncodedString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(value).map_err(serde::de::Error::custom)
    }
}

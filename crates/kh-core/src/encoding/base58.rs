use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::EncodingError;

const COMPRESSED_KEY_LEN: usize = 33;
const UNCOMPRESSED_KEY_LEN: usize = 65;

pub fn base58_encode(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

pub fn base58_decode(text: &str) -> Result<Vec<u8>, EncodingError> {
    bs58::decode(text)
        .into_vec()
        .map_err(|e| EncodingError::InvalidBase58(e.to_string()))
}

/// Base58 text of a SEC1 public key (33 or 65 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Base58EncodedPublicKey {
    value: String,
    data: Vec<u8>,
}

impl Base58EncodedPublicKey {
    /// Parse and validate base58 text.
    ///
    /// Fails on characters outside the alphabet and on decoded lengths other
    /// than 33 or 65 bytes.
    pub fn parse(value: impl Into<String>) -> Result<Self, EncodingError> {
        let value = value.into();
        let data = base58_decode(&value)?;
        if data.len() != COMPRESSED_KEY_LEN && data.len() != UNCOMPRESSED_KEY_LEN {
            return Err(EncodingError::InvalidBase58(format!(
                "expected {} or {} key bytes, got {}",
                COMPRESSED_KEY_LEN,
                UNCOMPRESSED_KEY_LEN,
                data.len()
            )));
        }
        Ok(Self { value, data })
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            value: base58_encode(&data),
            data,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Base58EncodedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Base58EncodedPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for Base58EncodedPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let bytes = vec![0u8, 0, 1, 2, 3, 254, 255];
        let text = base58_encode(&bytes);

        // leading zero bytes become leading '1's
        assert!(text.starts_with("11"));
        assert_eq!(base58_decode(&text).expect("decode"), bytes);
    }

    #[test]
    fn decode_rejects_characters_outside_alphabet() {
        for bad in ["0abc", "Oabc", "Iabc", "labc", "ab+c"] {
            assert!(
                matches!(base58_decode(bad), Err(EncodingError::InvalidBase58(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn parse_accepts_compressed_and_uncompressed_lengths() {
        let compressed = base58_encode(&[2u8; 33]);
        let uncompressed = base58_encode(&[4u8; 65]);

        assert_eq!(
            Base58EncodedPublicKey::parse(compressed).expect("33").as_bytes().len(),
            33
        );
        assert_eq!(
            Base58EncodedPublicKey::parse(uncompressed).expect("65").as_bytes().len(),
            65
        );
    }

    #[test]
    fn parse_rejects_other_lengths() {
        let short = base58_encode(&[4u8; 32]);
        assert!(Base58EncodedPublicKey::parse(short).is_err());
    }

    #[test]
    fn from_bytes_and_parse_agree() {
        let key = Base58EncodedPublicKey::from_bytes(vec![4u8; 65]);
        let parsed = Base58EncodedPublicKey::parse(key.as_str()).expect("parse");

        assert_eq!(key, parsed);
    }

    #[test]
    fn serde_uses_text_form() {
        let key = Base58EncodedPublicKey::from_bytes(vec![4u8; 65]);
        let json = serde_json::to_string(&key).expect("serialize");

        assert_eq!(json, format!("\"{}\"", key.as_str()));
        let back: Base58EncodedPublicKey = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, key);

        assert!(serde_json::from_str::<Base58EncodedPublicKey>("\"0OIl\"").is_err());
    }
}

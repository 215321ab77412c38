use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoding::{Base58EncodedPublicKey, Base64EncodedString};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImportStateError {
    /// Unknown `type` tag, missing fields or invalid field encodings
    #[error("invalid import state: {0}")]
    InvalidState(String),
}

/// Relay-side progress of an import channel.
///
/// Only ever moves `Initial -> Accepted -> Completed`. Decoding reads the
/// `type` tag first; any other tag is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImportState {
    Initial,
    Accepted(AcceptedImport),
    Completed(CompletedImport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedImport {
    pub owner_device_key: Base58EncodedPublicKey,
    /// Owner device's signature over the channel public key
    pub owner_proof: Base64EncodedString,
    pub accepted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedImport {
    pub encrypted_data: Base64EncodedString,
}

/// Body of `GET import/{channel}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetImportDataApiResponse {
    pub import_state: ImportState,
}

impl GetImportDataApiResponse {
    pub fn decode(body: &[u8]) -> Result<Self, ImportStateError> {
        serde_json::from_slice(body).map_err(|e| ImportStateError::InvalidState(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn accepted() -> ImportState {
        ImportState::Accepted(AcceptedImport {
            owner_device_key: Base58EncodedPublicKey::from_bytes(vec![4u8; 65]),
            owner_proof: Base64EncodedString::from_bytes(vec![1, 2, 3]),
            accepted_at: Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
        })
    }

    #[test]
    fn json_round_trip_for_every_variant() {
        let states = [
            ImportState::Initial,
            accepted(),
            ImportState::Completed(CompletedImport {
                encrypted_data: Base64EncodedString::from_bytes(b"sealed".to_vec()),
            }),
        ];

        for state in states {
            let json = serde_json::to_vec(&GetImportDataApiResponse {
                import_state: state.clone(),
            })
            .unwrap();
            let back = GetImportDataApiResponse::decode(&json).unwrap();
            assert_eq!(back.import_state, state);
        }
    }

    #[test]
    fn decodes_relay_wire_format() {
        let key = Base58EncodedPublicKey::from_bytes(vec![4u8; 65]);
        let body = format!(
            r#"{{"importState":{{"type":"Accepted","ownerDeviceKey":"{}","ownerProof":"AQID","acceptedAt":"2024-05-06T07:08:09.123+00:00"}}}}"#,
            key
        );

        let response = GetImportDataApiResponse::decode(body.as_bytes()).unwrap();
        let ImportState::Accepted(accepted) = response.import_state else {
            panic!("expected Accepted");
        };
        assert_eq!(accepted.owner_device_key, key);
        assert_eq!(accepted.owner_proof.as_bytes(), &[1, 2, 3]);

        let initial = GetImportDataApiResponse::decode(br#"{"importState":{"type":"Initial"}}"#).unwrap();
        assert_eq!(initial.import_state, ImportState::Initial);
    }

    #[test]
    fn serializes_type_tag_and_camel_case_fields() {
        let json = serde_json::to_value(accepted()).unwrap();
        assert_eq!(json["type"], "Accepted");
        assert!(json.get("ownerDeviceKey").is_some());
        assert!(json.get("ownerProof").is_some());
        assert!(json.get("acceptedAt").is_some());
    }

    #[test]
    fn unknown_tag_is_invalid_state() {
        let result = GetImportDataApiResponse::decode(br#"{"importState":{"type":"Rejected"}}"#);
        assert!(matches!(result, Err(ImportStateError::InvalidState(_))));
    }

    #[test]
    fn missing_fields_and_bad_encodings_are_invalid_state() {
        for body in [
            r#"{"importState":{}}"#.to_string(),
            r#"{"importState":{"type":"Accepted"}}"#.to_string(),
            r#"{"importState":{"type":"Completed","encryptedData":"%%%"}}"#.to_string(),
            r#"{"importState":{"type":"Accepted","ownerDeviceKey":"0OIl","ownerProof":"AQID","acceptedAt":"2024-05-06T07:08:09Z"}}"#.to_string(),
            "not json".to_string(),
        ] {
            assert!(
                GetImportDataApiResponse::decode(body.as_bytes()).is_err(),
                "{body} should be rejected"
            );
        }
    }
}

use tracing::warn;

use crate::crypto::AsymmetricKey;

use super::ImportState;

/// What the poller does with a decoded [`ImportState`].
#[derive(Debug)]
pub enum ImportDecision {
    KeepPolling,
    /// Owner proof verified; the key is verification and encryption only.
    Connected(AsymmetricKey),
    Terminate(&'static str),
}

impl ImportDecision {
    /// ## Behavior / 行为
    /// - `Initial` keeps polling
    /// - `Accepted` rebuilds the owner device key and checks `ownerProof` over
    ///   the channel key's raw public representation; any failure terminates
    /// - `Completed` terminates; the channel was consumed elsewhere
    pub fn interpret(state: &ImportState, channel_public_representation: &[u8]) -> Self {
        match state {
            ImportState::Initial => ImportDecision::KeepPolling,
            ImportState::Accepted(accepted) => {
                let Ok(owner_key) =
                    AsymmetricKey::from_public_representation(accepted.owner_device_key.as_bytes())
                else {
                    warn!(owner_key = %accepted.owner_device_key, "owner device key is not a valid P-256 point");
                    return ImportDecision::Terminate("owner device key rejected");
                };
                if owner_key.verify(channel_public_representation, accepted.owner_proof.as_bytes())
                {
                    ImportDecision::Connected(owner_key)
                } else {
                    warn!(owner_key = %accepted.owner_device_key, "owner proof did not verify");
                    ImportDecision::Terminate("owner proof did not verify")
                }
            }
            ImportState::Completed(_) => ImportDecision::Terminate("import already completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{Base58EncodedPublicKey, Base64EncodedString};
    use crate::import::{AcceptedImport, CompletedImport};
    use chrono::Utc;

    fn accepted(owner: &AsymmetricKey, proof: Vec<u8>) -> ImportState {
        ImportState::Accepted(AcceptedImport {
            owner_device_key: owner.public_key_base58(),
            owner_proof: Base64EncodedString::from_bytes(proof),
            accepted_at: Utc::now(),
        })
    }

    #[test]
    fn initial_keeps_polling() {
        assert!(matches!(
            ImportDecision::interpret(&ImportState::Initial, b"channel"),
            ImportDecision::KeepPolling
        ));
    }

    #[test]
    fn valid_proof_connects_with_owner_key() {
        let channel = AsymmetricKey::generate().unwrap();
        let owner = AsymmetricKey::generate().unwrap();
        let proof = owner.sign(&channel.public_representation()).unwrap();

        let decision =
            ImportDecision::interpret(&accepted(&owner, proof), &channel.public_representation());

        let ImportDecision::Connected(key) = decision else {
            panic!("expected Connected, got {:?}", decision);
        };
        assert_eq!(key.public_representation(), owner.public_representation());
        assert!(!key.can_sign());
    }

    #[test]
    fn flipped_proof_bit_terminates() {
        let channel = AsymmetricKey::generate().unwrap();
        let owner = AsymmetricKey::generate().unwrap();
        let mut proof = owner.sign(&channel.public_representation()).unwrap();
        let last = proof.len() - 1;
        proof[last] ^= 0x01;

        assert!(matches!(
            ImportDecision::interpret(&accepted(&owner, proof), &channel.public_representation()),
            ImportDecision::Terminate(_)
        ));
    }

    #[test]
    fn proof_over_other_channel_terminates() {
        let channel = AsymmetricKey::generate().unwrap();
        let other_channel = AsymmetricKey::generate().unwrap();
        let owner = AsymmetricKey::generate().unwrap();
        let proof = owner.sign(&other_channel.public_representation()).unwrap();

        assert!(matches!(
            ImportDecision::interpret(&accepted(&owner, proof), &channel.public_representation()),
            ImportDecision::Terminate(_)
        ));
    }

    #[test]
    fn off_curve_owner_key_terminates() {
        let mut bogus = vec![0x04];
        bogus.extend_from_slice(&[0u8; 64]);
        let state = ImportState::Accepted(AcceptedImport {
            owner_device_key: Base58EncodedPublicKey::from_bytes(bogus),
            owner_proof: Base64EncodedString::from_bytes(vec![0x30, 0x00]),
            accepted_at: Utc::now(),
        });

        assert!(matches!(
            ImportDecision::interpret(&state, b"channel"),
            ImportDecision::Terminate(_)
        ));
    }

    #[test]
    fn completed_terminates() {
        let state = ImportState::Completed(CompletedImport {
            encrypted_data: Base64EncodedString::empty(),
        });
        assert!(matches!(
            ImportDecision::interpret(&state, b"channel"),
            ImportDecision::Terminate(_)
        ));
    }
}

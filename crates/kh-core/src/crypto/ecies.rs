//! ECIES over P-256
//!
//! ```text
//! ephemeral keypair (e, E)
//! Z        = ECDH(e, recipient)
//! K || IV  = SHA-256(Z || 0x00000001 || E)        (ANSI X9.63 KDF, 32 bytes)
//! output   = E (65 bytes) || AES-128-GCM(K, IV, plaintext) || tag (16 bytes)
//! ```

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes128;
use aes_gcm::AesGcm;
use p256::ecdh::diffie_hellman;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::asymmetric_key::{random_secret, KeyError};

/// AES-128-GCM with a 16-byte IV
type Aes128Gcm16 = AesGcm<Aes128, U16>;

const POINT_LEN: usize = 65;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 16;

pub(super) fn seal(recipient: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, KeyError> {
    let ephemeral = random_secret()?;
    let ephemeral_point = ephemeral.public_key().to_encoded_point(false);

    let shared = diffie_hellman(ephemeral.to_nonzero_scalar(), recipient.as_affine());
    let okm = x963_kdf(shared.raw_secret_bytes().as_slice(), ephemeral_point.as_bytes());

    let cipher = Aes128Gcm16::new_from_slice(&okm[..KEY_LEN])
        .map_err(|_| KeyError::EncryptionFailure)?;
    let sealed = cipher
        .encrypt(GenericArray::from_slice(&okm[KEY_LEN..]), plaintext)
        .map_err(|_| KeyError::EncryptionFailure)?;

    let mut out = Vec::with_capacity(POINT_LEN + sealed.len());
    out.extend_from_slice(ephemeral_point.as_bytes());
    out.extend_from_slice(&sealed);
    Ok(out)
}

pub(super) fn open(secret: &SecretKey, data: &[u8]) -> Result<Vec<u8>, KeyError> {
    if data.len() < POINT_LEN + TAG_LEN {
        return Err(KeyError::DecryptionFailure);
    }
    let (point, sealed) = data.split_at(POINT_LEN);
    let ephemeral = PublicKey::from_sec1_bytes(point).map_err(|_| KeyError::DecryptionFailure)?;

    let shared = diffie_hellman(secret.to_nonzero_scalar(), ephemeral.as_affine());
    let okm = x963_kdf(shared.raw_secret_bytes().as_slice(), point);

    let cipher = Aes128Gcm16::new_from_slice(&okm[..KEY_LEN])
        .map_err(|_| KeyError::DecryptionFailure)?;
    cipher
        .decrypt(GenericArray::from_slice(&okm[KEY_LEN..]), sealed)
        .map_err(|_| KeyError::DecryptionFailure)
}

/// Single-block X9.63 KDF; SHA-256 output is exactly key (16) + IV (16).
fn x963_kdf(shared_secret: &[u8], shared_info: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut hasher = Sha256::new();
    hasher.update(shared_secret);
    hasher.update(1u32.to_be_bytes());
    hasher.update(shared_info);

    let mut okm = Zeroizing::new([0u8; 32]);
    okm.copy_from_slice(&hasher.finalize());
    okm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x963_kdf_is_deterministic_and_bound_to_shared_info() {
        let a = x963_kdf(&[7u8; 32], b"info-a");
        let b = x963_kdf(&[7u8; 32], b"info-a");
        let c = x963_kdf(&[7u8; 32], b"info-b");

        assert_eq!(*a, *b);
        assert_ne!(*a, *c);
    }

    #[test]
    fn open_rejects_truncated_and_tampered_input() {
        let secret = random_secret().expect("secret");
        let sealed = seal(&secret.public_key(), b"payload").expect("seal");

        assert_eq!(open(&secret, &sealed[..40]), Err(KeyError::DecryptionFailure));

        let mut tampered = sealed.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0x01;
        assert_eq!(open(&secret, &tampered), Err(KeyError::DecryptionFailure));

        assert_eq!(open(&secret, &sealed).expect("open"), b"payload");
    }

    #[test]
    fn each_seal_uses_a_fresh_ephemeral_key() {
        let secret = random_secret().expect("secret");
        let a = seal(&secret.public_key(), b"payload").expect("seal a");
        let b = seal(&secret.public_key(), b"payload").expect("seal b");

        assert_ne!(a[..POINT_LEN], b[..POINT_LEN]);
    }
}

use std::fmt;

use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use rand::{rngs::OsRng, TryRngCore};
use thiserror::Error;
use zeroize::Zeroizing;

use super::ecies;
use crate::encoding::Base58EncodedPublicKey;

/// Key operation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Public key bytes are not a valid SEC1 point on P-256
    #[error("invalid public key encoding")]
    InvalidKeyEncoding,

    /// The OS random source failed; fatal for the session
    #[error("entropy source failure")]
    EntropySourceFailure,

    /// Signing or decryption attempted with a verification-only key
    #[error("key has no private scalar")]
    MissingPrivateKey,

    #[error("signing failed")]
    SigningFailure,

    #[error("encryption failed")]
    EncryptionFailure,

    #[error("decryption failed")]
    DecryptionFailure,
}

const SCALAR_LEN: usize = 32;
const GENERATE_ATTEMPTS: usize = 8;
const COMPRESSED_POINT_LEN: usize = 33;
const UNCOMPRESSED_POINT_LEN: usize = 65;

/// Ephemeral P-256 key.
///
/// A generated key holds its private scalar and can sign and decrypt. A key
/// rebuilt from a peer's public representation is verification-only: it can
/// verify signatures and be encrypted to, never sign.
///
/// The private scalar is never serialized and is wiped on drop.
#[derive(Clone)]
pub struct AsymmetricKey {
    public: PublicKey,
    secret: Option<SecretKey>,
}

impl AsymmetricKey {
    /// Generate a fresh keypair from the OS CSPRNG.
    pub fn generate() -> Result<Self, KeyError> {
        let secret = random_secret()?;
        Ok(Self {
            public: secret.public_key(),
            secret: Some(secret),
        })
    }

    /// Rebuild a verification-only key from a 33 or 65 byte SEC1 point.
    pub fn from_public_representation(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != COMPRESSED_POINT_LEN && bytes.len() != UNCOMPRESSED_POINT_LEN {
            return Err(KeyError::InvalidKeyEncoding);
        }
        let public = PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyError::InvalidKeyEncoding)?;
        Ok(Self {
            public,
            secret: None,
        })
    }

    /// Uncompressed SEC1 encoding of the public point (65 bytes).
    pub fn public_representation(&self) -> Vec<u8> {
        self.public.to_encoded_point(false).as_bytes().to_vec()
    }

    pub fn public_key_base58(&self) -> Base58EncodedPublicKey {
        Base58EncodedPublicKey::from_bytes(self.public_representation())
    }

    pub fn can_sign(&self) -> bool {
        self.secret.is_some()
    }

    /// ECDSA P-256 / SHA-256 signature, DER encoded.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        let secret = self.secret.as_ref().ok_or(KeyError::MissingPrivateKey)?;
        let signing_key = SigningKey::from(secret);
        let signature: Signature = signing_key
            .try_sign(message)
            .map_err(|_| KeyError::SigningFailure)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    /// Verify a DER signature over `message`.
    ///
    /// Every failure cause (wrong key, tampered message, malformed signature)
    /// yields `false`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = Signature::from_der(signature) else {
            return false;
        };
        VerifyingKey::from(&self.public)
            .verify(message, &signature)
            .is_ok()
    }

    /// Encrypt `data` so that only the holder of this key's private scalar can read it.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, KeyError> {
        ecies::seal(&self.public, data)
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, KeyError> {
        let secret = self.secret.as_ref().ok_or(KeyError::MissingPrivateKey)?;
        ecies::open(secret, ciphertext)
    }
}

impl fmt::Debug for AsymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsymmetricKey")
            .field("public", &self.public_key_base58().as_str())
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Draw a valid non-zero scalar below the curve order from the OS random source.
pub(super) fn random_secret() -> Result<SecretKey, KeyError> {
    for _ in 0..GENERATE_ATTEMPTS {
        let mut bytes = Zeroizing::new([0u8; SCALAR_LEN]);
        OsRng
            .try_fill_bytes(&mut bytes[..])
            .map_err(|_| KeyError::EntropySourceFailure)?;
        // Rejects zero and values >= n.
        if let Ok(secret) = SecretKey::from_slice(&bytes[..]) {
            return Ok(secret);
        }
    }
    Err(KeyError::EntropySourceFailure)
}

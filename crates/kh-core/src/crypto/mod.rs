//! Cryptographic primitives
//!
//! - **AsymmetricKey**: ephemeral P-256 keypairs, ECDSA signing/verification
//! - **ECIES**: encryption to a peer's public key (ECDH + X9.63 KDF + AES-GCM)

mod asymmetric_key;
mod ecies;

pub use asymmetric_key::{AsymmetricKey, KeyError};

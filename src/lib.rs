//! # keyhandoff
//!
//! Hands a recovery phrase to a separate owner device over an untrusted relay.
//! The relay only ever sees signed requests and ciphertext encrypted to the
//! owner device's verified key.

pub mod bootstrap;
mod handoff;

pub use handoff::{Handoff, KeyHandoff};
pub use kh_app::{FailureReason, PairingSession, SessionError, SessionOutcome, SessionStatus};
pub use kh_core::config::{KeyHandoffConfig, PollingPolicy, RelayConfig};
pub use kh_core::import::WordListLanguage;
pub use kh_infra::load_config;

//! # kh-app
//!
//! Use cases built on the `kh-core` ports. The pairing session drives the
//! whole handshake: deep link, relay polling, peer verification and the
//! encrypted export.

pub mod usecases;

pub use usecases::pairing::{
    FailureReason, InvalidSessionState, PairingSession, SessionError, SessionEvent,
    SessionEvents, SessionOutcome, SessionStatus,
};

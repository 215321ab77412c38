//! Pairing-and-export session
//!
//! # Lifecycle / 生命周期
//!
//! ```text
//! new ──► connect ──► poll every interval ──► Accepted + valid proof ──► Connected
//!              │                 │                                         │
//!              │                 └─ timeout / transport / bad proof ──► Failed
//!              └─ cancel (any time) ──────────────────────────────────► Failed
//! Connected ──► export_phrase ──► POST encrypted ──► Succeeded | Failed
//! ```

mod events;
mod outcome;
mod poller;
mod session;

pub use events::{FailureReason, SessionEvent, SessionEvents, SessionStatus};
pub use outcome::SessionOutcome;
pub use session::{InvalidSessionState, PairingSession, SessionError};

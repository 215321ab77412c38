//! Ports implemented by infrastructure adapters.

pub mod clock;
pub mod relay;

pub use clock::ClockPort;
pub use relay::{RelayError, RelayPort, RelayResponse};

//! Self-verifying deep link shown to the peer out-of-band.

mod deep_link;

pub use deep_link::{DeepLink, LinkError};

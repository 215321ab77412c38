//! # kh-infra
//!
//! Adapters behind the `kh-core` ports: the reqwest relay client, the system
//! clock and TOML configuration loading.

pub mod config;
pub mod relay;
pub mod time;

pub use config::load_config;
pub use relay::HttpRelayClient;
pub use time::SystemClock;

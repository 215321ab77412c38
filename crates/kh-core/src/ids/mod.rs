//! ID type wrappers for type safety.

pub mod channel_id;

pub use channel_id::ChannelId;

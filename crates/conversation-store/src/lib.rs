//! Conversation transcript and local key-value persistence.
//!
//! The transcript lives in memory for the lifetime of a session. Anything
//! that must survive a restart goes through a [`KeyValueStore`].

mod error;
mod kv;
mod store;
mod types;

pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use store::Transcript;
pub use types::*;

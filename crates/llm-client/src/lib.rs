//! Hosted chat completion client with OpenAI-compatible API.

mod client;
mod error;
mod types;

pub use client::{ChatBackend, LlmClient};
pub use error::LlmError;
pub use types::*;

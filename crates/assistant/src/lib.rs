//! Tool-routing assistant and slide-deck front end.
//!
//! ```text
//! query → Router (TOOL: NAME | NO TOOL) → Dispatcher (one tool, or none)
//!       → ConversationTurn → Transcript
//! ```

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod pipeline;
pub mod router;

#[cfg(test)]
mod testing;

pub use dispatcher::Dispatcher;
pub use error::{AppError, AppResult};
pub use pipeline::{Agent, UnconfiguredBackend};
pub use router::{Route, Router};

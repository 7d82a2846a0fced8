//! Terminal command handlers.
//!
//! Lines starting with `!` are commands; anything else is a query for the
//! routing agent.

mod chat;
mod deck;
mod decks;
mod delete;
mod edit;
mod export;
mod help;
mod history;
mod tools;

pub use self::tools::ToolsHandler;
pub use chat::ChatHandler;
pub use deck::{parse_deck_request, DeckHandler};
pub use decks::{DecksHandler, ShowHandler};
pub use delete::DeleteHandler;
pub use edit::{parse_slide_edit, EditHandler};
pub use export::ExportHandler;
pub use help::HelpHandler;
pub use history::HistoryHandler;

use crate::error::AppResult;
use async_trait::async_trait;

/// Command handler trait.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name (e.g., "help", "deck").
    fn name(&self) -> &str;

    /// Command trigger (e.g., "!help").
    fn trigger(&self) -> Option<&str> {
        None
    }

    /// Whether this is the default handler for non-command input.
    fn is_default(&self) -> bool {
        false
    }

    /// Check if this handler matches the input line.
    ///
    /// Triggers match whole words, so `!deck` does not claim `!decks`.
    fn matches(&self, input: &str) -> bool {
        if let Some(trigger) = self.trigger() {
            input.split_whitespace().next() == Some(trigger)
        } else {
            self.is_default() && !input.starts_with('!')
        }
    }

    /// Execute the command.
    async fn execute(&self, input: &str) -> AppResult<String>;
}

/// Text following the command word, trimmed.
pub(crate) fn arguments(input: &str) -> &str {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(idx) => input[idx..].trim(),
        None => "",
    }
}

/// Split `key=value; key=value` pairs. Keys are lowercased; entries without
/// `=` are returned with an empty key.
pub(crate) fn key_values(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((key, value)) => (key.trim().to_ascii_lowercase(), value.trim().to_string()),
            None => (String::new(), part.to_string()),
        })
        .collect()
}

/// Comma-separated list with blanks dropped.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

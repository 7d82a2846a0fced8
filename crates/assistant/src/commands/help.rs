//! Help command - displays available commands.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use async_trait::async_trait;

pub struct HelpHandler;

impl HelpHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HelpHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn name(&self) -> &str {
        "help"
    }

    fn trigger(&self) -> Option<&str> {
        Some("!help")
    }

    async fn execute(&self, _input: &str) -> AppResult<String> {
        Ok(r#"Type a question to ask the assistant. It picks at most one tool to answer with.

Commands:
  !tools                          List the tools the router can pick
  !history                        Show every query and its outcome
  !deck key=value; ...            Generate a slide deck
        keys: topic, purpose, audience, slides, points (comma separated),
              style, length, images
  !decks                          List saved decks
  !show <id>                      Show one deck
  !edit <id> <slide> field=value; ...
        fields: title, content, notes, image, prompt, sources
  !export <id>                    Write the deck as a .pptx file
  !delete <id>                    Delete a saved deck
  !help                           Show this message"#
            .into())
    }
}

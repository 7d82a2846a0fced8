//! Chat command - sends free text through the routing agent.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use crate::pipeline::Agent;
use async_trait::async_trait;
use conversation_store::ConversationTurn;
use std::sync::Arc;

pub struct ChatHandler {
    agent: Arc<Agent>,
}

impl ChatHandler {
    pub fn new(agent: Arc<Agent>) -> Self {
        Self { agent }
    }
}

/// `[route] response`, or the error for a failed turn.
pub fn render_turn(turn: &ConversationTurn) -> String {
    match (&turn.response, &turn.error) {
        (Some(response), _) => format!("[{}] {}", turn.route, response),
        (None, Some(error)) => format!("[{}] {}", turn.route, error),
        (None, None) => format!("[{}]", turn.route),
    }
}

#[async_trait]
impl CommandHandler for ChatHandler {
    fn name(&self) -> &str {
        "chat"
    }

    fn is_default(&self) -> bool {
        true
    }

    async fn execute(&self, input: &str) -> AppResult<String> {
        let turn = self.agent.process_query(input.trim()).await;
        Ok(render_turn(&turn))
    }
}

//! History command - prints the transcript.

use crate::commands::chat::render_turn;
use crate::commands::CommandHandler;
use crate::error::AppResult;
use async_trait::async_trait;
use conversation_store::Transcript;

pub struct HistoryHandler {
    transcript: Transcript,
}

impl HistoryHandler {
    pub fn new(transcript: Transcript) -> Self {
        Self { transcript }
    }
}

#[async_trait]
impl CommandHandler for HistoryHandler {
    fn name(&self) -> &str {
        "history"
    }

    fn trigger(&self) -> Option<&str> {
        Some("!history")
    }

    async fn execute(&self, _input: &str) -> AppResult<String> {
        let turns = self.transcript.turns().await;
        if turns.is_empty() {
            return Ok("No queries yet.".into());
        }

        let lines: Vec<String> = turns
            .iter()
            .enumerate()
            .map(|(i, turn)| {
                format!(
                    "{}. {} {}\n   {}",
                    i + 1,
                    turn.timestamp.format("%H:%M:%S"),
                    turn.query,
                    render_turn(turn)
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conversation_store::ConversationTurn;

    #[tokio::test]
    async fn test_history_in_submission_order() {
        let transcript = Transcript::new();
        transcript
            .append(ConversationTurn::answered("2+2?", "calculate", "4"))
            .await;
        transcript
            .append(ConversationTurn::failed("hello", "rate limited"))
            .await;

        let out = HistoryHandler::new(transcript).execute("!history").await.unwrap();

        let first = out.find("1. ").unwrap();
        let second = out.find("2. ").unwrap();
        assert!(first < second);
        assert!(out.contains("[calculate] 4"));
        assert!(out.contains("[error] rate limited"));
    }

    #[tokio::test]
    async fn test_empty_history() {
        let out = HistoryHandler::new(Transcript::new())
            .execute("!history")
            .await
            .unwrap();
        assert_eq!(out, "No queries yet.");
    }
}

//! Append-only in-memory transcript.

use crate::types::ConversationTurn;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Ordered record of every processed query.
///
/// Turns can only be appended; nothing already recorded is changed or
/// removed. Clones share the same underlying transcript.
#[derive(Clone, Default)]
pub struct Transcript {
    turns: Arc<RwLock<Vec<ConversationTurn>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn, returning its position.
    pub async fn append(&self, turn: ConversationTurn) -> usize {
        let mut turns = self.turns.write().await;
        turns.push(turn);
        let index = turns.len() - 1;
        debug!(index, "Appended conversation turn");
        index
    }

    /// Snapshot of all turns in submission order.
    pub async fn turns(&self) -> Vec<ConversationTurn> {
        self.turns.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.turns.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.read().await.is_empty()
    }

    /// The most recent turn, if any.
    pub async fn last(&self) -> Option<ConversationTurn> {
        self.turns.read().await.last().cloned()
    }
}

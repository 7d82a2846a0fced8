//! Delete command - removes a saved deck.

use crate::commands::{arguments, CommandHandler};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use slide_deck::PresentationLibrary;
use std::sync::Arc;

pub struct DeleteHandler {
    library: Arc<PresentationLibrary>,
}

impl DeleteHandler {
    pub fn new(library: Arc<PresentationLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl CommandHandler for DeleteHandler {
    fn name(&self) -> &str {
        "delete"
    }

    fn trigger(&self) -> Option<&str> {
        Some("!delete")
    }

    async fn execute(&self, input: &str) -> AppResult<String> {
        let id = arguments(input);
        if id.is_empty() {
            return Err(AppError::Usage("Usage: !delete <id>".into()));
        }
        let removed = self.library.delete(id).await?;
        Ok(format!("Deleted {} \"{}\"", removed.id, removed.config.topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conversation_store::MemoryStore;
    use slide_deck::{Presentation, PresentationConfig};

    #[tokio::test]
    async fn test_delete_removes_deck() {
        let library = Arc::new(
            PresentationLibrary::load(Arc::new(MemoryStore::new()))
                .await
                .unwrap(),
        );
        let now = Utc::now();
        library
            .add(Presentation {
                id: "presentation-7".into(),
                config: PresentationConfig::new("Tides", 1),
                slides: Vec::new(),
                references: Vec::new(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        let handler = DeleteHandler::new(library.clone());

        let out = handler.execute("!delete presentation-7").await.unwrap();
        assert_eq!(out, "Deleted presentation-7 \"Tides\"");
        assert!(library.is_empty().await);

        assert!(handler.execute("!delete presentation-7").await.is_err());
        assert!(matches!(
            handler.execute("!delete").await,
            Err(AppError::Usage(_))
        ));
    }
}

//! Library listing commands.

use crate::commands::deck::summarize;
use crate::commands::{arguments, CommandHandler};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use slide_deck::{DeckError, Presentation, PresentationLibrary};
use std::sync::Arc;

/// `!decks` - one line per saved deck.
pub struct DecksHandler {
    library: Arc<PresentationLibrary>,
}

impl DecksHandler {
    pub fn new(library: Arc<PresentationLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl CommandHandler for DecksHandler {
    fn name(&self) -> &str {
        "decks"
    }

    fn trigger(&self) -> Option<&str> {
        Some("!decks")
    }

    async fn execute(&self, _input: &str) -> AppResult<String> {
        let presentations = self.library.list().await;
        if presentations.is_empty() {
            return Ok("No saved decks.".into());
        }

        Ok(presentations
            .iter()
            .map(|p| {
                format!(
                    "{}  {}  ({} slides, updated {})",
                    p.id,
                    p.config.topic,
                    p.slides.len(),
                    p.updated_at.format("%Y-%m-%d %H:%M")
                )
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// `!show <id>` - full slide text of one deck.
pub struct ShowHandler {
    library: Arc<PresentationLibrary>,
}

impl ShowHandler {
    pub fn new(library: Arc<PresentationLibrary>) -> Self {
        Self { library }
    }
}

fn render(presentation: &Presentation) -> String {
    let mut out = summarize(presentation);
    for (i, slide) in presentation.slides.iter().enumerate() {
        out.push_str(&format!("\n\n[{}] {}\n{}", i + 1, slide.title, slide.content));
        if let Some(url) = &slide.image_url {
            let shown = if url.starts_with("data:") { "(embedded image)" } else { url.as_str() };
            out.push_str(&format!("\nImage: {}", shown));
        }
        if let Some(notes) = slide.notes.as_deref().filter(|n| !n.is_empty()) {
            out.push_str(&format!("\nNotes: {}", notes));
        }
        if !slide.sources().is_empty() {
            out.push_str(&format!("\nSources: {}", slide.sources().join(", ")));
        }
    }
    if !presentation.references.is_empty() {
        out.push_str("\n\nReferences:");
        for reference in &presentation.references {
            out.push_str(&format!("\n- {}", reference));
        }
    }
    out
}

#[async_trait]
impl CommandHandler for ShowHandler {
    fn name(&self) -> &str {
        "show"
    }

    fn trigger(&self) -> Option<&str> {
        Some("!show")
    }

    async fn execute(&self, input: &str) -> AppResult<String> {
        let id = arguments(input);
        if id.is_empty() {
            return Err(AppError::Usage("Usage: !show <id>".into()));
        }
        let presentation = self
            .library
            .get(id)
            .await
            .ok_or_else(|| DeckError::NotFound(id.to_string()))?;
        Ok(render(&presentation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conversation_store::MemoryStore;
    use slide_deck::{PresentationConfig, Slide};

    async fn library_with_deck() -> Arc<PresentationLibrary> {
        let library = PresentationLibrary::load(Arc::new(MemoryStore::new()))
            .await
            .unwrap();
        let now = Utc::now();
        library
            .add(Presentation {
                id: "presentation-1".into(),
                config: PresentationConfig::new("Glaciers", 1),
                slides: vec![Slide {
                    id: "slide-0".into(),
                    title: "Ice".into(),
                    content: "Moves slowly".into(),
                    image_url: Some("data:image/png;base64,AAAA".into()),
                    notes: Some("Pause here".into()),
                    sources: Some(vec!["https://example.org".into()]),
                    image_prompt: None,
                    generated_at: None,
                }],
                references: vec!["Glacier Atlas".into()],
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        Arc::new(library)
    }

    #[tokio::test]
    async fn test_decks_lists_saved() {
        let out = DecksHandler::new(library_with_deck().await)
            .execute("!decks")
            .await
            .unwrap();
        assert!(out.starts_with("presentation-1  Glaciers  (1 slides"));
    }

    #[tokio::test]
    async fn test_show_renders_slides() {
        let out = ShowHandler::new(library_with_deck().await)
            .execute("!show presentation-1")
            .await
            .unwrap();

        assert!(out.contains("[1] Ice\nMoves slowly"));
        assert!(out.contains("Image: (embedded image)"));
        assert!(out.contains("Notes: Pause here"));
        assert!(out.contains("Sources: https://example.org"));
        assert!(out.contains("- Glacier Atlas"));
    }

    #[tokio::test]
    async fn test_show_unknown_id() {
        let handler = ShowHandler::new(library_with_deck().await);
        assert!(matches!(
            handler.execute("!show nope").await,
            Err(AppError::Deck(DeckError::NotFound(_)))
        ));
        assert!(matches!(handler.execute("!show").await, Err(AppError::Usage(_))));
    }
}

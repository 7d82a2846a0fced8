//! Edit command - changes fields of one saved slide.

use crate::commands::{arguments, key_values, split_list, CommandHandler};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use slide_deck::{DeckError, PresentationLibrary, SlideEdit};
use std::sync::Arc;

const USAGE: &str = "Usage: !edit <id> <slide number> field=value; ...";

pub struct EditHandler {
    library: Arc<PresentationLibrary>,
}

impl EditHandler {
    pub fn new(library: Arc<PresentationLibrary>) -> Self {
        Self { library }
    }
}

/// Parse `field=value; ...`. `image=` with no value removes the image.
pub fn parse_slide_edit(text: &str) -> Result<SlideEdit, String> {
    let mut edit = SlideEdit::default();
    for (key, value) in key_values(text) {
        match key.as_str() {
            "title" => edit.title = Some(value),
            "content" => edit.content = Some(value),
            "notes" => edit.notes = Some(value),
            "image" => edit.image_url = Some(value),
            "prompt" => edit.image_prompt = Some(value),
            "sources" => edit.sources = Some(split_list(&value)),
            "" => return Err(format!("expected field=value, got '{}'", value)),
            other => return Err(format!("unknown slide field '{}'", other)),
        }
    }
    if edit.is_empty() {
        return Err("nothing to change".into());
    }
    Ok(edit)
}

#[async_trait]
impl CommandHandler for EditHandler {
    fn name(&self) -> &str {
        "edit"
    }

    fn trigger(&self) -> Option<&str> {
        Some("!edit")
    }

    async fn execute(&self, input: &str) -> AppResult<String> {
        let mut parts = arguments(input).splitn(3, char::is_whitespace);
        let (Some(id), Some(number), Some(fields)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AppError::Usage(USAGE.into()));
        };
        let number: usize = number
            .parse()
            .map_err(|_| AppError::Usage(USAGE.into()))?;
        let edit = parse_slide_edit(fields).map_err(AppError::Usage)?;

        let presentation = self
            .library
            .get(id)
            .await
            .ok_or_else(|| DeckError::NotFound(id.to_string()))?;
        let slide_id = number
            .checked_sub(1)
            .and_then(|i| presentation.slides.get(i))
            .map(|slide| slide.id.clone())
            .ok_or_else(|| DeckError::SlideNotFound(number.to_string()))?;

        let updated = self.library.update_slide(id, &slide_id, &edit).await?;
        let slide = updated
            .slides
            .iter()
            .find(|s| s.id == slide_id)
            .ok_or(DeckError::SlideNotFound(slide_id.clone()))?;
        Ok(format!("Updated slide {} of {}: {}", number, updated.id, slide.title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conversation_store::MemoryStore;
    use slide_deck::{Presentation, PresentationConfig, Slide};

    fn slide(id: &str, title: &str) -> Slide {
        Slide {
            id: id.into(),
            title: title.into(),
            content: "Body".into(),
            image_url: Some("https://img/1".into()),
            notes: None,
            sources: None,
            image_prompt: None,
            generated_at: None,
        }
    }

    async fn handler() -> (EditHandler, Arc<PresentationLibrary>) {
        let library = Arc::new(
            PresentationLibrary::load(Arc::new(MemoryStore::new()))
                .await
                .unwrap(),
        );
        let now = Utc::now();
        library
            .add(Presentation {
                id: "p1".into(),
                config: PresentationConfig::new("Bees", 2),
                slides: vec![slide("slide-0", "Hive"), slide("slide-1", "Pollen")],
                references: vec![],
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        (EditHandler::new(library.clone()), library)
    }

    #[test]
    fn test_parse_slide_edit() {
        let edit = parse_slide_edit("title=New; sources=a, b; image=").unwrap();
        assert_eq!(edit.title.as_deref(), Some("New"));
        assert_eq!(edit.sources, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(edit.image_url.as_deref(), Some(""));

        assert!(parse_slide_edit("").is_err());
        assert!(parse_slide_edit("colour=red").is_err());
        assert!(parse_slide_edit("just text").is_err());
    }

    #[tokio::test]
    async fn test_edit_second_slide() {
        let (handler, library) = handler().await;

        let out = handler
            .execute("!edit p1 2 title=Nectar; image=")
            .await
            .unwrap();
        assert_eq!(out, "Updated slide 2 of p1: Nectar");

        let saved = library.get("p1").await.unwrap();
        assert_eq!(saved.slides[0].title, "Hive");
        assert_eq!(saved.slides[1].title, "Nectar");
        assert!(saved.slides[1].image_url.is_none());
    }

    #[tokio::test]
    async fn test_edit_rejects_bad_targets() {
        let (handler, _) = handler().await;

        assert!(matches!(
            handler.execute("!edit p1 3 title=X").await,
            Err(AppError::Deck(DeckError::SlideNotFound(_)))
        ));
        assert!(matches!(
            handler.execute("!edit p1 0 title=X").await,
            Err(AppError::Deck(DeckError::SlideNotFound(_)))
        ));
        assert!(matches!(
            handler.execute("!edit nope 1 title=X").await,
            Err(AppError::Deck(DeckError::NotFound(_)))
        ));
        assert!(matches!(
            handler.execute("!edit p1 title=X").await,
            Err(AppError::Usage(_))
        ));
    }
}

//! Deck command - generates a slide deck and saves it to the library.

use crate::commands::{arguments, key_values, split_list, CommandHandler};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use slide_deck::{
    DeckError, DeckGenerator, Presentation, PresentationConfig, PresentationLibrary,
    DEFAULT_SLIDE_COUNT,
};
use std::sync::Arc;
use tracing::info;

pub struct DeckHandler {
    /// `None` when no content API key is configured.
    generator: Option<Arc<DeckGenerator>>,
    library: Arc<PresentationLibrary>,
}

impl DeckHandler {
    pub fn new(generator: Option<Arc<DeckGenerator>>, library: Arc<PresentationLibrary>) -> Self {
        Self { generator, library }
    }
}

/// Build a config from `key=value; ...`. A part without `=` is the topic.
pub fn parse_deck_request(text: &str) -> Result<PresentationConfig, String> {
    let mut config = PresentationConfig::new("", DEFAULT_SLIDE_COUNT);

    for (key, value) in key_values(text) {
        match key.as_str() {
            "" | "topic" => config.topic = value,
            "purpose" => config.purpose = value.parse()?,
            "audience" => config.audience = value,
            "slides" | "count" => {
                config.slide_count = value
                    .parse()
                    .map_err(|_| format!("slide count '{}' is not a number", value))?
            }
            "points" => config.key_points = split_list(&value),
            "style" | "theme" => config.style = value.parse()?,
            "length" => config.content_length = value.parse()?,
            "images" => config.image_source = value.parse()?,
            other => return Err(format!("unknown deck option '{}'", other)),
        }
    }

    config.validate()?;
    Ok(config)
}

pub(crate) fn summarize(presentation: &Presentation) -> String {
    let mut out = format!(
        "{} \"{}\" ({} slides, {})",
        presentation.id,
        presentation.config.topic,
        presentation.slides.len(),
        presentation.config.style.as_str()
    );
    for (i, slide) in presentation.slides.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, slide.title));
    }
    out
}

#[async_trait]
impl CommandHandler for DeckHandler {
    fn name(&self) -> &str {
        "deck"
    }

    fn trigger(&self) -> Option<&str> {
        Some("!deck")
    }

    async fn execute(&self, input: &str) -> AppResult<String> {
        let config = parse_deck_request(arguments(input)).map_err(AppError::Usage)?;
        let generator = self
            .generator
            .as_ref()
            .ok_or(AppError::Deck(DeckError::MissingApiKey))?;

        let presentation = generator.generate(config).await?;
        self.library.add(presentation.clone()).await?;
        info!(id = %presentation.id, "Deck saved");

        Ok(format!("Created {}", summarize(&presentation)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conversation_store::MemoryStore;
    use slide_deck::{
        ContentGenerator, GeneratedContent, GeneratedSlide, ImageModel, ImageService, Purpose,
        Theme, FALLBACK_IMAGE_URL,
    };

    struct CannedContent;

    #[async_trait]
    impl ContentGenerator for CannedContent {
        async fn generate(
            &self,
            config: &PresentationConfig,
        ) -> Result<GeneratedContent, DeckError> {
            Ok(GeneratedContent {
                slides: (0..config.slide_count)
                    .map(|i| GeneratedSlide {
                        title: format!("Slide {}", i + 1),
                        content: "Body".into(),
                        notes: None,
                        image_prompt: None,
                        sources: None,
                    })
                    .collect(),
                references: vec![],
            })
        }
    }

    struct MalformedContent;

    #[async_trait]
    impl ContentGenerator for MalformedContent {
        async fn generate(
            &self,
            _config: &PresentationConfig,
        ) -> Result<GeneratedContent, DeckError> {
            let err = serde_json::from_str::<GeneratedContent>("not json").unwrap_err();
            Err(DeckError::InvalidContent(err))
        }
    }

    async fn library() -> Arc<PresentationLibrary> {
        Arc::new(
            PresentationLibrary::load(Arc::new(MemoryStore::new()))
                .await
                .unwrap(),
        )
    }

    #[test]
    fn test_parse_deck_request() {
        let config = parse_deck_request(
            "topic=Rust async; slides=3; purpose=educational; audience=students; \
             points=futures, executors; style=midnight; length=brief; images=unsplash",
        )
        .unwrap();

        assert_eq!(config.topic, "Rust async");
        assert_eq!(config.slide_count, 3);
        assert_eq!(config.purpose, Purpose::Educational);
        assert_eq!(config.audience, "students");
        assert_eq!(config.key_points, vec!["futures", "executors"]);
        assert_eq!(config.style, Theme::Midnight);
        assert_eq!(config.image_source, ImageModel::Unsplash);
    }

    #[test]
    fn test_parse_bare_topic_uses_defaults() {
        let config = parse_deck_request("Ocean currents").unwrap();
        assert_eq!(config.topic, "Ocean currents");
        assert_eq!(config.slide_count, DEFAULT_SLIDE_COUNT);
        assert_eq!(config.style, Theme::Verdigris);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_deck_request("").is_err());
        assert!(parse_deck_request("topic=X; slides=many").is_err());
        assert!(parse_deck_request("topic=X; slides=0").is_err());
        assert!(parse_deck_request("topic=X; style=neon").is_err());
        assert!(parse_deck_request("topic=X; colour=red").is_err());
    }

    #[tokio::test]
    async fn test_generates_and_saves() {
        let generator =
            DeckGenerator::new(Arc::new(CannedContent), Arc::new(ImageService::new()));
        let library = library().await;
        let handler = DeckHandler::new(Some(Arc::new(generator)), library.clone());

        let out = handler.execute("!deck topic=Tides; slides=2").await.unwrap();

        assert!(out.starts_with("Created presentation-"));
        assert!(out.contains("2. Slide 2"));
        let saved = library.list().await;
        assert_eq!(saved.len(), 1);
        assert_eq!(
            saved[0].slides[0].image_url.as_deref(),
            Some(FALLBACK_IMAGE_URL)
        );
    }

    #[tokio::test]
    async fn test_missing_key_saves_nothing() {
        let library = library().await;
        let handler = DeckHandler::new(None, library.clone());

        let err = handler.execute("!deck topic=Tides").await.unwrap_err();
        assert!(matches!(err, AppError::Deck(DeckError::MissingApiKey)));
        assert!(library.is_empty().await);
    }

    #[tokio::test]
    async fn test_malformed_content_saves_nothing() {
        let generator =
            DeckGenerator::new(Arc::new(MalformedContent), Arc::new(ImageService::new()));
        let library = library().await;
        let handler = DeckHandler::new(Some(Arc::new(generator)), library.clone());

        let err = handler.execute("!deck topic=Tides; slides=2").await.unwrap_err();
        assert!(matches!(err, AppError::Deck(DeckError::InvalidContent(_))));
        assert!(library.is_empty().await);
    }
}

//! Turns a [`PresentationConfig`] into a finished [`Presentation`].

use crate::content::ContentGenerator;
use crate::error::DeckError;
use crate::images::ImageService;
use crate::types::{GeneratedSlide, ImageModel, Presentation, PresentationConfig, Slide};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, instrument};

/// Default number of slide images requested at once.
pub const DEFAULT_IMAGE_CONCURRENCY: usize = 4;

pub struct DeckGenerator {
    content: Arc<dyn ContentGenerator>,
    images: Arc<ImageService>,
    image_concurrency: usize,
}

impl DeckGenerator {
    pub fn new(content: Arc<dyn ContentGenerator>, images: Arc<ImageService>) -> Self {
        Self {
            content,
            images,
            image_concurrency: DEFAULT_IMAGE_CONCURRENCY,
        }
    }

    pub fn with_image_concurrency(mut self, concurrency: usize) -> Self {
        self.image_concurrency = concurrency.max(1);
        self
    }

    /// Generate slide text, then one image per slide.
    ///
    /// Content failures are returned as errors. Image failures never are:
    /// every slide ends up with some image URL.
    #[instrument(skip(self, config), fields(topic = %config.topic, slides = config.slide_count))]
    pub async fn generate(&self, config: PresentationConfig) -> Result<Presentation, DeckError> {
        config.validate().map_err(DeckError::InvalidConfig)?;

        let content = self.content.generate(&config).await?;
        let model = config.image_source;

        let slides: Vec<Slide> = stream::iter(content.slides.into_iter().enumerate())
            .map(|(index, generated)| self.build_slide(index, generated, model))
            .buffered(self.image_concurrency)
            .collect()
            .await;

        let now = Utc::now();
        let presentation = Presentation {
            id: format!("presentation-{}", now.timestamp_millis()),
            config,
            slides,
            references: content.references,
            created_at: now,
            updated_at: now,
        };

        info!(id = %presentation.id, "Presentation generated");
        Ok(presentation)
    }

    async fn build_slide(
        &self,
        index: usize,
        generated: GeneratedSlide,
        model: ImageModel,
    ) -> Slide {
        let prompt = generated
            .image_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&generated.title);
        let image_url = self.images.generate(prompt, model).await;

        Slide {
            id: format!("slide-{}", index),
            title: generated.title,
            content: generated.content,
            image_url: Some(image_url),
            notes: generated.notes,
            sources: generated.sources,
            image_prompt: generated.image_prompt,
            generated_at: Some(Utc::now()),
        }
    }
}

//! Export command - writes a saved deck as a `.pptx` file.

use crate::commands::{arguments, CommandHandler};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use slide_deck::{export_pptx, DeckError, ImageFetcher, PresentationLibrary};
use std::path::PathBuf;
use std::sync::Arc;

pub struct ExportHandler {
    library: Arc<PresentationLibrary>,
    fetcher: Arc<dyn ImageFetcher>,
    output_dir: PathBuf,
}

impl ExportHandler {
    pub fn new(
        library: Arc<PresentationLibrary>,
        fetcher: Arc<dyn ImageFetcher>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            library,
            fetcher,
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for ExportHandler {
    fn name(&self) -> &str {
        "export"
    }

    fn trigger(&self) -> Option<&str> {
        Some("!export")
    }

    async fn execute(&self, input: &str) -> AppResult<String> {
        let id = arguments(input);
        if id.is_empty() {
            return Err(AppError::Usage("Usage: !export <id>".into()));
        }
        let presentation = self
            .library
            .get(id)
            .await
            .ok_or_else(|| DeckError::NotFound(id.to_string()))?;

        let path = export_pptx(&presentation, self.fetcher.as_ref(), &self.output_dir).await?;
        Ok(format!("Saved {}", path.display()))
    }
}

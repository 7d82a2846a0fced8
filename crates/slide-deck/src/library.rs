//! Persisted list of generated presentations.

use crate::error::DeckError;
use crate::types::{Presentation, SlideEdit};
use chrono::Utc;
use conversation_store::KeyValueStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Store key holding the JSON array of all presentations.
pub const LIBRARY_KEY: &str = "ai_presentations";

/// All presentations, loaded once and rewritten in full on every change.
pub struct PresentationLibrary {
    store: Arc<dyn KeyValueStore>,
    presentations: RwLock<Vec<Presentation>>,
}

impl PresentationLibrary {
    /// Load the library from the store.
    ///
    /// A stored value that no longer parses is logged and treated as empty
    /// rather than blocking startup.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, DeckError> {
        let presentations = match store.get(LIBRARY_KEY).await? {
            Some(json) => match serde_json::from_str::<Vec<Presentation>>(&json) {
                Ok(list) => list,
                Err(e) => {
                    warn!(error = %e, "Stored presentations are unreadable, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        info!(count = presentations.len(), "Loaded presentation library");
        Ok(Self {
            store,
            presentations: RwLock::new(presentations),
        })
    }

    pub async fn list(&self) -> Vec<Presentation> {
        self.presentations.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.presentations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.presentations.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<Presentation> {
        self.presentations
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub async fn add(&self, presentation: Presentation) -> Result<(), DeckError> {
        let mut guard = self.presentations.write().await;
        let mut next = guard.clone();
        next.push(presentation);
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }

    /// Apply `edit` to one slide and bump the presentation's `updated_at`.
    pub async fn update_slide(
        &self,
        presentation_id: &str,
        slide_id: &str,
        edit: &SlideEdit,
    ) -> Result<Presentation, DeckError> {
        let mut guard = self.presentations.write().await;
        let mut next = guard.clone();

        let presentation = next
            .iter_mut()
            .find(|p| p.id == presentation_id)
            .ok_or_else(|| DeckError::NotFound(presentation_id.to_string()))?;
        let slide = presentation
            .slides
            .iter_mut()
            .find(|s| s.id == slide_id)
            .ok_or_else(|| DeckError::SlideNotFound(slide_id.to_string()))?;

        edit.apply(slide);
        presentation.updated_at = Utc::now();
        let updated = presentation.clone();

        self.persist(&next).await?;
        *guard = next;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<Presentation, DeckError> {
        let mut guard = self.presentations.write().await;
        let index = guard
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DeckError::NotFound(id.to_string()))?;

        let mut next = guard.clone();
        let removed = next.remove(index);
        self.persist(&next).await?;
        *guard = next;
        Ok(removed)
    }

    async fn persist(&self, presentations: &[Presentation]) -> Result<(), DeckError> {
        let json = serde_json::to_string(presentations)?;
        self.store.set(LIBRARY_KEY, &json).await?;
        debug!(count = presentations.len(), bytes = json.len(), "Persisted library");
        Ok(())
    }
}

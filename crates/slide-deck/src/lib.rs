//! AI slide deck generation.
//!
//! ```text
//! config → content model (strict JSON) → per-slide images (fallback chain)
//!        → presentation → library (persisted) → .pptx export
//! ```
//!
//! # Modules
//!
//! - [`content`] - Gemini content generation and reply parsing
//! - [`images`] - image back ends and the fallback chain
//! - [`generator`] - assembles a presentation from content and images
//! - [`library`] - persisted presentation list
//! - [`export`] - PresentationML export

pub mod content;
pub mod error;
pub mod export;
pub mod generator;
pub mod images;
pub mod library;
pub mod types;

pub use content::{ContentGenerator, GeminiClient};
pub use error::{DeckError, ImageError};
pub use export::{export_pptx, HttpImageFetcher, ImageFetcher};
pub use generator::DeckGenerator;
pub use images::{ImageBackend, ImageService, FALLBACK_IMAGE_URL};
pub use library::{PresentationLibrary, LIBRARY_KEY};
pub use types::*;

//! Slide deck error types.

use conversation_store::StoreError;
use thiserror::Error;

/// Errors from deck generation, the library and export.
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from content model")]
    EmptyResponse,

    /// The model reply was not the JSON document that was asked for.
    #[error("Failed to parse AI response as JSON: {0}")]
    InvalidContent(#[source] serde_json::Error),

    #[error("Expected {expected} slides, got {actual}")]
    SlideCount { expected: usize, actual: usize },

    #[error("Invalid presentation config: {0}")]
    InvalidConfig(String),

    #[error("Presentation not found: {0}")]
    NotFound(String),

    #[error("Slide not found: {0}")]
    SlideNotFound(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Package error: {0}")]
    Package(#[from] zip::result::ZipError),
}

/// Errors from a single image back end.
///
/// These never reach callers of the image service; they only decide
/// whether the next back end in the chain is tried.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{backend} API error {status}: {message}")]
    Api {
        backend: &'static str,
        status: u16,
        message: String,
    },

    #[error("{0} response contained no image")]
    NoImage(&'static str),

    #[error("{0} request did not complete")]
    Incomplete(&'static str),

    #[error("Invalid data URL")]
    InvalidDataUrl,

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

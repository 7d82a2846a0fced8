//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Model error: {0}")]
    Llm(#[from] llm_client::LlmError),

    #[error("Storage error: {0}")]
    Store(#[from] conversation_store::StoreError),

    #[error("Deck error: {0}")]
    Deck(#[from] slide_deck::DeckError),

    #[error("{0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;

//! Error types for scriptqa.

use thiserror::Error;

/// Library-level error type for scriptqa operations.
#[derive(Error, Debug)]
pub enum ScriptQaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Authentication with the model provider failed: {0}")]
    Authentication(String),

    #[error("Model provider quota exhausted: {0}")]
    QuotaExceeded(String),

    #[error("Model provider rate limit hit: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type alias for scriptqa operations.
pub type Result<T> = std::result::Result<T, ScriptQaError>;

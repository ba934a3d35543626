//! Error types for notetaker.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotetakerError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Inference backend errors
    #[error("Failed to initialize {backend} backend: {message}")]
    BackendInit { backend: String, message: String },

    #[error("{backend} inference failed: {message}")]
    Inference { backend: String, message: String },

    #[error("{backend} returned an unexpected response: {message}")]
    MalformedResponse { backend: String, message: String },

    // Pipeline errors
    #[error("{stage} timed out after {timeout:?}")]
    StageTimeout { stage: String, timeout: Duration },

    #[error("{stage} worker failed: {message}")]
    StageFault { stage: String, message: String },

    // Persistence errors
    #[error("Failed to persist audit document to {path}: {message}")]
    Persistence { path: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, NotetakerError>;

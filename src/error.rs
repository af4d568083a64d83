//! Error types for resumegen
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::llm::LlmError;

/// All error types that can occur while generating a resume
#[derive(Debug, Error)]
pub enum ResumeError {
    /// The character description was empty
    #[error("Input prompt is empty")]
    EmptyPrompt,

    /// LLM call failed
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Prompt template could not be rendered
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration is invalid
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for resumegen operations
pub type Result<T> = std::result::Result<T, ResumeError>;

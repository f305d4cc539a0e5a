// shared-types-rs/src/error.rs
// Error taxonomy for the pipeline steps

use crate::config::ConfigError;

/// Result alias used across the pipeline crates
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// Failures a pipeline step can run into.
///
/// Only the enhancer (`Classification`) and the logger (`Persistence`)
/// recover locally; every other variant aborts the step that raised it.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field '{field}' has the wrong type, expected {expected}")]
    InvalidField { field: String, expected: &'static str },

    #[error("Failed to classify chatbot response: {0}")]
    Classification(String),

    #[error("Failed to persist log entry: {0}")]
    Persistence(String),

    #[error("Dashboard submission rejected: {0}")]
    Submission(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PipelineError {
    pub fn missing(field: &str) -> Self {
        PipelineError::MissingField(field.to_string())
    }

    pub fn invalid(field: &str, expected: &'static str) -> Self {
        PipelineError::InvalidField {
            field: field.to_string(),
            expected,
        }
    }

    /// Whether the step that raised this error must abort.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PipelineError::Classification(_) | PipelineError::Persistence(_)
        )
    }
}

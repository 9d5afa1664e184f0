use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the prediction and similarity core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller-facing input problem. The message always names the offending
    /// field and is safe to return verbatim.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// A model, scaler, encoder or dataset file could not be loaded.
    #[error("Failed to load {}: {message}", path.display())]
    ArtifactLoad { path: PathBuf, message: String },

    /// The feature vector length does not match what a fitted artifact
    /// expects. Indicates drift between the artifacts and the pipeline code,
    /// never a caller mistake.
    #[error("Feature vector length mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn artifact_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        CoreError::ArtifactLoad {
            path: path.into(),
            message: message.into(),
        }
    }
}

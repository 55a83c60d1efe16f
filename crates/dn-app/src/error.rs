//! Error types for the dn-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives front ends a single error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Segment not found: {0}")]
    SegmentNotFound(String),

    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for dn-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<dn_project::ProjectError> for AppError {
    fn from(err: dn_project::ProjectError) -> Self {
        match err {
            dn_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<dn_engine::EngineError> for AppError {
    fn from(err: dn_engine::EngineError) -> Self {
        AppError::Engine(err.to_string())
    }
}

impl From<dn_results::ResultsError> for AppError {
    fn from(err: dn_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

//! Error types for propagation engines.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path data: {what}")]
    InvalidInput { what: String },

    #[error("Engine failed: {message}")]
    Failed { message: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

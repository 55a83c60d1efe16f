//! Error types for catalog operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Spectrum JSON is malformed: {message}")]
    MalformedJson { message: String },

    #[error("Spectrum must be a JSON object keyed by band label")]
    NotAnObject,

    #[error("Spectrum is missing band {label} Hz")]
    MissingBand { label: &'static str },

    #[error("Spectrum band {label} Hz is not a number: {value}")]
    NotANumber { label: &'static str, value: String },

    #[error("Invalid spectrum: {0}")]
    Core(#[from] dn_core::CoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::MalformedJson {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CatalogError::MissingBand { label: "4000" };
        assert!(err.to_string().contains("4000"));
    }
}

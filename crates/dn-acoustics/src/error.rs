use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcousticsError {
    #[error("No NC-{rating} curve (ratings run 15..=65 in steps of 5)")]
    UnknownCurve { rating: u8 },

    #[error("Unknown spectrum shape: {name}")]
    UnknownShape { name: String },

    #[error("Unknown space type: {name}")]
    UnknownSpaceType { name: String },
}

pub type AcousticsResult<T> = Result<T, AcousticsError>;

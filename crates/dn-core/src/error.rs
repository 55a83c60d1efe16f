use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Octave spectrum must have {expected} bands, got {found}")]
    BandCount { expected: usize, found: usize },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

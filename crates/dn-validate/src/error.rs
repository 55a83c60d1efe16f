//! Faults raised inside validator bodies.
//!
//! These never leave the crate as `Err`: the guard converts them into
//! structural errors on the returned `ValidationResult`.

use dn_core::CoreError;
use dn_graph::GraphError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidateFault {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("{what} is missing")]
    Missing { what: String },
}

pub type ValidateResult<T> = Result<T, ValidateFault>;

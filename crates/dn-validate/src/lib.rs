//! dn-validate: layered, non-throwing validators for duct paths.
//!
//! Every validator returns a [`ValidationResult`]; none of them returns an
//! error or panics on bad data. A fault inside a validator (a non-finite
//! number, an unresolvable graph) is turned into a structural error naming
//! the validator, so callers only ever inspect one result type.
//!
//! Validators come in two groups:
//! - snapshot validators over project records (`validate_path`,
//!   `validate_segment`, `validate_mechanical_unit_connection`,
//!   `validate_segment_connectivity`)
//! - calculation validators over assembled [`dn_engine::PathData`]
//!   (`validate_calculation_inputs`, `validate_calculation_ranges`,
//!   `validate_path_element`, `validate_physical_constraints`,
//!   `validate_path_consistency`)

pub mod bounds;
pub mod calculation;
pub mod element;
pub mod error;
mod guard;
pub mod snapshot;

pub use calculation::{
    validate_calculation_inputs, validate_calculation_ranges, validate_path_consistency,
    validate_physical_constraints,
};
pub use dn_core::ValidationResult;
pub use element::{
    PathElement, validate_duct_element, validate_fitting_element, validate_path_element,
    validate_source_element, validate_terminal_element,
};
pub use error::{ValidateFault, ValidateResult};
pub use snapshot::{
    validate_mechanical_unit_connection, validate_path, validate_segment,
    validate_segment_connectivity,
};

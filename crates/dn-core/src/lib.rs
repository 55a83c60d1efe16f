//! dn-core: stable foundation for ductnoise.
//!
//! Contains:
//! - units (uom quantities + imperial duct constructors)
//! - numeric (Real + tolerances + decibel helpers)
//! - ids (compact IDs for the segment graph)
//! - spectrum (8-band octave spectra and A-weighting)
//! - validation (accumulating, non-throwing validation results)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod spectrum;
pub mod units;
pub mod validation;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use spectrum::{A_WEIGHTING_DB, BAND_COUNT, BAND_LABELS, OCTAVE_FREQUENCIES_HZ, OctaveBands};
pub use units::*;
pub use validation::ValidationResult;

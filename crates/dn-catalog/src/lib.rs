//! dn-catalog: equipment and fitting reference data for ductnoise.
//!
//! Provides:
//! - Flat default tables (component noise levels, fitting noise adjustments)
//! - Parsing of mechanical-unit octave spectra stored as JSON
//! - The `UnitCatalog` lookup seam
//! - Matching of drawn components to scheduled mechanical units
//!
//! # Example
//!
//! ```
//! use dn_catalog::{match_unit, MatchMethod};
//! use dn_project::{ComponentType, MechanicalUnitDef};
//!
//! let units = vec![
//!     MechanicalUnitDef::new("u1", "AHU-1", "AHU"),
//!     MechanicalUnitDef::new("u2", "AHU-2", "AHU"),
//! ];
//! let found = match_unit(units.as_slice(), "ahu 2", ComponentType::Ahu).unwrap();
//! assert_eq!(found.unit.name, "AHU-2");
//! assert_eq!(found.method, MatchMethod::NumericTag);
//! ```

pub mod defaults;
pub mod error;
pub mod matching;
pub mod spectra;
pub mod traits;

// Re-exports
pub use defaults::{DEFAULT_UNIT_DBA, default_fitting_adjustment, default_noise_level};
pub use error::{CatalogError, CatalogResult};
pub use matching::{MatchMethod, UnitMatch, match_unit, numeric_tag, unit_type_family};
pub use spectra::{SpectrumSource, parse_spectrum_json, preferred_spectrum};
pub use traits::UnitCatalog;

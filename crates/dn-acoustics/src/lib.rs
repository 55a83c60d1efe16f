//! dn-acoustics: Noise Criteria rating and A-weighted level analysis.
//!
//! Pure functions over eight-band octave spectra:
//! - NC curve table and rating (`determine_nc_rating`, `nc_curve`)
//! - Overall A-weighted level (`calculate_overall_dba`)
//! - Full spectrum analysis with exceedances and heuristic warnings
//! - Approximate dBA → octave distribution from spectrum shape templates
//! - Space-type NC targets and noise-control recommendations

pub mod error;
pub mod estimate;
pub mod nc;
pub mod standards;

pub use error::{AcousticsError, AcousticsResult};
pub use estimate::{SpectrumShape, estimate_octave_bands_from_dba};
pub use nc::{
    DEFAULT_NC_RATING, NC_CURVES, NcAnalysis, analyze_octave_band_data, calculate_overall_dba,
    determine_nc_rating, nc_curve,
};
pub use standards::{
    ComplianceStatus, SpaceCriteria, SpaceType, StandardsComparison, compare_to_standards,
    recommend_noise_control,
};

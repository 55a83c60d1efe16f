//! Engineering sanity bounds. Values outside these ranges are warnings, not
//! errors: unusual designs exist, they just deserve a second look.

pub const MAX_SEGMENT_LENGTH_FT: f64 = 500.0;

pub const RECT_DIMENSION_RANGE_IN: (f64, f64) = (4.0, 120.0);
pub const ROUND_DIAMETER_RANGE_IN: (f64, f64) = (4.0, 96.0);

pub const AIRFLOW_RANGE_CFM: (f64, f64) = (100.0, 50_000.0);
pub const VELOCITY_RANGE_FPM: (f64, f64) = (100.0, 6_000.0);

pub const SOURCE_LEVEL_RANGE_DBA: (f64, f64) = (20.0, 140.0);
pub const MAX_FITTING_ADJUSTMENT_DB: f64 = 20.0;

/// Relative spread of segment flow rates above which a path is suspicious.
pub const FLOW_SPREAD_WARN: f64 = 0.5;
/// Relative spread of cross-sections worth mentioning.
pub const AREA_SPREAD_INFO: f64 = 0.8;
/// Allowed disagreement between a stored velocity and flow / area.
pub const VELOCITY_MISMATCH: f64 = 0.1;

pub(crate) fn outside(value: f64, (lo, hi): (f64, f64)) -> bool {
    value < lo || value > hi
}

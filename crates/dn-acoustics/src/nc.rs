//! NC curves, rating and A-weighted overall level.

use dn_core::{A_WEIGHTING_DB, BAND_COUNT, OCTAVE_FREQUENCIES_HZ, OctaveBands, db_to_power, power_to_db};
use serde::Serialize;

use crate::error::{AcousticsError, AcousticsResult};

/// Rating reported for input that is not an eight-band spectrum.
pub const DEFAULT_NC_RATING: u8 = 30;

/// Standard NC limit curves (dB at 63..8000 Hz), ascending.
pub const NC_CURVES: [(u8, [f64; BAND_COUNT]); 11] = [
    (15, [47.0, 36.0, 29.0, 22.0, 17.0, 14.0, 12.0, 11.0]),
    (20, [51.0, 40.0, 33.0, 26.0, 22.0, 19.0, 17.0, 16.0]),
    (25, [54.0, 44.0, 37.0, 31.0, 27.0, 24.0, 22.0, 21.0]),
    (30, [57.0, 48.0, 41.0, 35.0, 31.0, 29.0, 28.0, 27.0]),
    (35, [60.0, 52.0, 45.0, 40.0, 36.0, 34.0, 33.0, 32.0]),
    (40, [64.0, 56.0, 50.0, 45.0, 41.0, 39.0, 38.0, 37.0]),
    (45, [67.0, 60.0, 54.0, 49.0, 46.0, 44.0, 43.0, 42.0]),
    (50, [71.0, 64.0, 58.0, 54.0, 51.0, 49.0, 48.0, 47.0]),
    (55, [74.0, 67.0, 62.0, 58.0, 56.0, 54.0, 53.0, 52.0]),
    (60, [77.0, 71.0, 67.0, 63.0, 61.0, 59.0, 58.0, 57.0]),
    (65, [80.0, 75.0, 71.0, 68.0, 66.0, 64.0, 63.0, 62.0]),
];

/// Limit vector of a standard curve.
pub fn nc_curve(rating: u8) -> Option<&'static [f64; BAND_COUNT]> {
    NC_CURVES
        .iter()
        .find(|(nc, _)| *nc == rating)
        .map(|(_, limits)| limits)
}

/// Lowest NC curve the spectrum does not exceed at any band.
///
/// Input that is not exactly eight bands rates as NC-30; spectra above every
/// curve are clamped to NC-65.
pub fn determine_nc_rating(levels: &[f64]) -> u8 {
    if levels.len() != BAND_COUNT {
        return DEFAULT_NC_RATING;
    }
    NC_CURVES
        .iter()
        .find(|(_, limits)| levels.iter().zip(limits).all(|(level, limit)| level <= limit))
        .map_or(NC_CURVES[NC_CURVES.len() - 1].0, |(nc, _)| *nc)
}

/// Overall A-weighted level (dBA).
///
/// Bands at or below 0 dB contribute nothing. An empty sum is 0.0 dBA.
pub fn calculate_overall_dba(levels: &[f64]) -> f64 {
    let total: f64 = levels
        .iter()
        .zip(A_WEIGHTING_DB)
        .filter(|(level, _)| **level > 0.0)
        .map(|(level, weight)| db_to_power(level + weight))
        .sum();
    power_to_db(total)
}

/// Result of analysing one spectrum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NcAnalysis {
    pub nc_rating: u8,
    pub spectrum: OctaveBands,
    /// (frequency Hz, dB over the target curve) for every exceeded band.
    pub exceedances: Vec<(u32, f64)>,
    pub overall_dba: f64,
    pub meets_criteria: bool,
    pub warnings: Vec<String>,
}

/// Rate a spectrum and, when a target is given, check it against that curve.
pub fn analyze_octave_band_data(
    spectrum: &OctaveBands,
    target_nc: Option<u8>,
) -> AcousticsResult<NcAnalysis> {
    let levels = spectrum.levels();
    let nc_rating = determine_nc_rating(levels);
    let overall_dba = calculate_overall_dba(levels);

    let mut exceedances = Vec::new();
    if let Some(target) = target_nc {
        let limits = nc_curve(target).ok_or(AcousticsError::UnknownCurve { rating: target })?;
        for ((hz, level), limit) in OCTAVE_FREQUENCIES_HZ.iter().zip(levels).zip(limits) {
            if level > limit {
                exceedances.push((*hz, level - limit));
            }
        }
    }

    let mut warnings = Vec::new();
    let (low, mid, high) = (levels[0], levels[4], levels[7]);
    if low > mid + 10.0 {
        warnings.push(format!(
            "Low-frequency dominance: 63 Hz is {:.1} dB above 1000 Hz; consider low-frequency treatment",
            low - mid
        ));
    }
    if high > mid + 5.0 {
        warnings.push(format!(
            "High-frequency emphasis: 8000 Hz is {:.1} dB above 1000 Hz",
            high - mid
        ));
    }
    if spectrum.max_level() < 20.0 {
        warnings.push("Very low sound levels; verify the input spectrum".to_string());
    }
    if nc_rating > 50 {
        warnings.push(format!(
            "NC-{nc_rating} is high; noise control measures are likely required"
        ));
    } else if nc_rating < 20 {
        warnings.push(format!(
            "NC-{nc_rating} is unusually low; double-check input levels"
        ));
    }
    if let Some(target) = target_nc
        && !exceedances.is_empty()
    {
        let bands: Vec<String> = exceedances.iter().map(|(hz, _)| format!("{hz} Hz")).collect();
        warnings.push(format!("Exceeds NC-{target} at {}", bands.join(", ")));
    }

    Ok(NcAnalysis {
        nc_rating,
        spectrum: *spectrum,
        meets_criteria: exceedances.is_empty(),
        exceedances,
        overall_dba,
        warnings,
    })
}

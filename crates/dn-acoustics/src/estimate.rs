//! Approximate octave spectra from a single dBA figure.
//!
//! This is a heuristic distribution, not an inverse of A-weighting: the
//! chosen shape fixes the relative band levels and the whole template is
//! offset until its A-weighted sum matches the requested level.

use std::fmt;
use std::str::FromStr;

use dn_core::{A_WEIGHTING_DB, BAND_COUNT, OctaveBands, db_to_power, power_to_db};
use serde::{Deserialize, Serialize};

use crate::error::AcousticsError;

/// Relative spectrum template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectrumShape {
    #[default]
    TypicalHvac,
    FanNoise,
    DiffuserNoise,
    DuctBreakout,
    Flat,
}

impl SpectrumShape {
    pub const ALL: [SpectrumShape; 5] = [
        SpectrumShape::TypicalHvac,
        SpectrumShape::FanNoise,
        SpectrumShape::DiffuserNoise,
        SpectrumShape::DuctBreakout,
        SpectrumShape::Flat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpectrumShape::TypicalHvac => "typical_hvac",
            SpectrumShape::FanNoise => "fan_noise",
            SpectrumShape::DiffuserNoise => "diffuser_noise",
            SpectrumShape::DuctBreakout => "duct_breakout",
            SpectrumShape::Flat => "flat",
        }
    }

    /// Band levels relative to 1 kHz (dB).
    pub fn relative_levels(self) -> [f64; BAND_COUNT] {
        match self {
            SpectrumShape::TypicalHvac => [8.0, 6.0, 4.0, 2.0, 0.0, -3.0, -6.0, -9.0],
            SpectrumShape::FanNoise => [10.0, 8.0, 5.0, 2.0, 0.0, -4.0, -8.0, -12.0],
            SpectrumShape::DiffuserNoise => [-5.0, -2.0, 0.0, 1.0, 0.0, -1.0, -3.0, -6.0],
            SpectrumShape::DuctBreakout => [12.0, 9.0, 5.0, 1.0, 0.0, -5.0, -10.0, -15.0],
            SpectrumShape::Flat => [0.0; BAND_COUNT],
        }
    }
}

impl fmt::Display for SpectrumShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpectrumShape {
    type Err = AcousticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str() == wanted)
            .ok_or_else(|| AcousticsError::UnknownShape { name: s.to_string() })
    }
}

/// Spread `dba` over eight bands following `shape`. Bands never go below 0 dB.
pub fn estimate_octave_bands_from_dba(dba: f64, shape: SpectrumShape) -> OctaveBands {
    let relative = shape.relative_levels();
    let template_dba = power_to_db(
        relative
            .iter()
            .zip(A_WEIGHTING_DB)
            .map(|(level, weight)| db_to_power(level + weight))
            .sum(),
    );
    let offset = dba - template_dba;
    OctaveBands::new(relative.map(|level| (level + offset).max(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate_overall_dba;

    #[test]
    fn estimate_reproduces_the_requested_level() {
        for shape in SpectrumShape::ALL {
            let bands = estimate_octave_bands_from_dba(45.0, shape);
            assert!(
                (calculate_overall_dba(bands.levels()) - 45.0).abs() < 1e-6,
                "{shape}"
            );
        }
    }

    #[test]
    fn shape_is_preserved() {
        let bands = estimate_octave_bands_from_dba(55.0, SpectrumShape::FanNoise);
        let levels = bands.levels();
        assert!((levels[0] - levels[4] - 10.0).abs() < 1e-9);
        assert!(levels.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn low_levels_are_clamped() {
        let bands = estimate_octave_bands_from_dba(5.0, SpectrumShape::DuctBreakout);
        assert!(bands.levels().iter().all(|&v| v >= 0.0));
        assert_eq!(bands.band(7), Some(0.0));
    }

    #[test]
    fn shapes_parse_from_names() {
        assert_eq!("fan_noise".parse::<SpectrumShape>().unwrap(), SpectrumShape::FanNoise);
        assert_eq!("Duct Breakout".parse::<SpectrumShape>().unwrap(), SpectrumShape::DuctBreakout);
        assert!("pink".parse::<SpectrumShape>().is_err());
    }
}

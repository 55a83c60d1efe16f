//! Octave-band sound spectra.

use crate::{CoreError, CoreResult};

/// Number of octave bands carried by every spectrum.
pub const BAND_COUNT: usize = 8;

/// Octave band centre frequencies (Hz).
pub const OCTAVE_FREQUENCIES_HZ: [u32; BAND_COUNT] = [63, 125, 250, 500, 1000, 2000, 4000, 8000];

/// Band labels as they appear in catalog JSON.
pub const BAND_LABELS: [&str; BAND_COUNT] = ["63", "125", "250", "500", "1000", "2000", "4000", "8000"];

/// A-weighting corrections (dB) per octave band.
pub const A_WEIGHTING_DB: [f64; BAND_COUNT] = [-26.2, -16.1, -8.6, -3.2, 0.0, 1.2, 1.0, -1.1];

/// Sound pressure levels (dB) at the eight standard octave bands.
///
/// Always exactly eight finite entries. Anything else is rejected at
/// construction and has to be handled as "no spectrum" by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f64>", into = "Vec<f64>"))]
pub struct OctaveBands([f64; BAND_COUNT]);

impl OctaveBands {
    pub const fn new(levels: [f64; BAND_COUNT]) -> Self {
        Self(levels)
    }

    pub const fn zero() -> Self {
        Self([0.0; BAND_COUNT])
    }

    /// Build from a slice, requiring exactly eight finite values.
    pub fn from_slice(levels: &[f64]) -> CoreResult<Self> {
        if levels.len() != BAND_COUNT {
            return Err(CoreError::BandCount {
                expected: BAND_COUNT,
                found: levels.len(),
            });
        }
        let mut out = [0.0; BAND_COUNT];
        for (slot, &v) in out.iter_mut().zip(levels) {
            *slot = crate::ensure_finite(v, "octave band level")?;
        }
        Ok(Self(out))
    }

    pub fn levels(&self) -> &[f64; BAND_COUNT] {
        &self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Level at a band index (0 = 63 Hz).
    pub fn band(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Pairs of (frequency Hz, level dB).
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        OCTAVE_FREQUENCIES_HZ.iter().copied().zip(self.0.iter().copied())
    }

    pub fn max_level(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every band raised (or lowered) by the same amount.
    pub fn shifted(&self, delta_db: f64) -> Self {
        Self(self.0.map(|v| v + delta_db))
    }

    /// True when every band is zero, which catalogs use for "not measured".
    pub fn is_silent(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }
}

impl TryFrom<Vec<f64>> for OctaveBands {
    type Error = CoreError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&value)
    }
}

impl From<OctaveBands> for Vec<f64> {
    fn from(value: OctaveBands) -> Self {
        value.0.to_vec()
    }
}

use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Sound level (dB) to relative linear power.
#[inline]
pub fn db_to_power(level_db: Real) -> Real {
    10f64.powf(level_db / 10.0)
}

/// Relative linear power back to dB. Non-positive power has no level and
/// maps to 0.0.
#[inline]
pub fn power_to_db(power: Real) -> Real {
    if power > 0.0 { 10.0 * power.log10() } else { 0.0 }
}

/// Relative spread `(max - min) / max` of a set of positive values.
///
/// Returns `None` when fewer than two values are given or the maximum is not
/// positive.
pub fn spread_ratio(values: &[Real]) -> Option<Real> {
    if values.len() < 2 {
        return None;
    }
    let max = values.iter().copied().fold(Real::NEG_INFINITY, Real::max);
    let min = values.iter().copied().fold(Real::INFINITY, Real::min);
    if max > 0.0 { Some((max - min) / max) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn decibel_conversions_invert() {
        let p = db_to_power(47.0);
        assert!(nearly_equal(power_to_db(p), 47.0, Tolerances::default()));
        assert_eq!(power_to_db(0.0), 0.0);
        assert_eq!(power_to_db(-3.0), 0.0);
    }

    #[test]
    fn spread_ratio_cases() {
        assert_eq!(spread_ratio(&[500.0]), None);
        assert_eq!(spread_ratio(&[0.0, 0.0]), None);
        let r = spread_ratio(&[1000.0, 400.0, 800.0]).unwrap();
        assert!(nearly_equal(r, 0.6, Tolerances::default()));
    }
}

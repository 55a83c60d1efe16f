//! Mechanical-unit spectra stored as JSON objects keyed by band label.

use dn_core::{BAND_COUNT, BAND_LABELS, OctaveBands};
use dn_project::MechanicalUnitDef;
use serde_json::Value;
use tracing::warn;

use crate::error::{CatalogError, CatalogResult};

/// Which of a unit's scheduled spectra a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumSource {
    Outlet,
    Inlet,
    Radiated,
}

impl SpectrumSource {
    /// Preference order when a unit carries several spectra.
    pub const PREFERENCE: [SpectrumSource; 3] = [
        SpectrumSource::Outlet,
        SpectrumSource::Inlet,
        SpectrumSource::Radiated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpectrumSource::Outlet => "outlet",
            SpectrumSource::Inlet => "inlet",
            SpectrumSource::Radiated => "radiated",
        }
    }

    fn raw(self, unit: &MechanicalUnitDef) -> Option<&str> {
        match self {
            SpectrumSource::Outlet => unit.outlet_spectrum_json.as_deref(),
            SpectrumSource::Inlet => unit.inlet_spectrum_json.as_deref(),
            SpectrumSource::Radiated => unit.radiated_spectrum_json.as_deref(),
        }
    }
}

/// Parse a stored spectrum.
///
/// Blank text, `null` and `{}` mean "not scheduled" and give `Ok(None)`.
/// Anything else must name all eight bands with numeric (or numeric string)
/// values.
pub fn parse_spectrum_json(raw: &str) -> CatalogResult<Option<OctaveBands>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(trimmed)?;
    let map = match value {
        Value::Null => return Ok(None),
        Value::Object(map) if map.is_empty() => return Ok(None),
        Value::Object(map) => map,
        _ => return Err(CatalogError::NotAnObject),
    };

    let mut levels = [0.0; BAND_COUNT];
    for (slot, label) in levels.iter_mut().zip(BAND_LABELS) {
        let entry = map.get(label).ok_or(CatalogError::MissingBand { label })?;
        *slot = match entry {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| CatalogError::NotANumber {
            label,
            value: entry.to_string(),
        })?;
    }
    Ok(Some(OctaveBands::from_slice(&levels)?))
}

/// First usable spectrum of a unit in outlet → inlet → radiated order.
///
/// Malformed spectra are skipped (and logged), so a broken outlet entry does
/// not hide a good inlet one.
pub fn preferred_spectrum(unit: &MechanicalUnitDef) -> Option<(SpectrumSource, OctaveBands)> {
    for source in SpectrumSource::PREFERENCE {
        let Some(raw) = source.raw(unit) else {
            continue;
        };
        match parse_spectrum_json(raw) {
            Ok(Some(bands)) => return Some((source, bands)),
            Ok(None) => {}
            Err(err) => {
                warn!(unit = %unit.name, spectrum = source.as_str(), error = %err, "ignoring unusable spectrum");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLET: &str = r#"{"63": 82, "125": 78, "250": 74, "500": 70, "1000": 66, "2000": 61, "4000": 56, "8000": 50}"#;

    #[test]
    fn parses_numeric_and_string_values() {
        let bands = parse_spectrum_json(OUTLET).unwrap().unwrap();
        assert_eq!(bands.band(0), Some(82.0));
        assert_eq!(bands.band(7), Some(50.0));

        let quoted = r#"{"63": "60", "125": "58.5", "250": 55, "500": 52, "1000": 50, "2000": 47, "4000": 44, "8000": 40}"#;
        let bands = parse_spectrum_json(quoted).unwrap().unwrap();
        assert_eq!(bands.band(1), Some(58.5));
    }

    #[test]
    fn empty_forms_are_not_scheduled() {
        assert_eq!(parse_spectrum_json("").unwrap(), None);
        assert_eq!(parse_spectrum_json("  null ").unwrap(), None);
        assert_eq!(parse_spectrum_json("{}").unwrap(), None);
    }

    #[test]
    fn partial_spectrum_is_rejected_not_padded() {
        let partial = r#"{"63": 60, "125": 58, "250": 55}"#;
        assert_eq!(
            parse_spectrum_json(partial).unwrap_err(),
            CatalogError::MissingBand { label: "500" }
        );
        assert_eq!(parse_spectrum_json("[1,2,3]").unwrap_err(), CatalogError::NotAnObject);
        assert!(matches!(
            parse_spectrum_json("{not json").unwrap_err(),
            CatalogError::MalformedJson { .. }
        ));
    }

    #[test]
    fn outlet_preferred_then_inlet_then_radiated() {
        let mut unit = MechanicalUnitDef::new("u1", "AHU-1", "AHU");
        unit.radiated_spectrum_json = Some(OUTLET.replace("82", "60"));
        assert_eq!(preferred_spectrum(&unit).unwrap().0, SpectrumSource::Radiated);

        unit.inlet_spectrum_json = Some(OUTLET.replace("82", "70"));
        assert_eq!(preferred_spectrum(&unit).unwrap().0, SpectrumSource::Inlet);

        unit.outlet_spectrum_json = Some(OUTLET.to_string());
        let (source, bands) = preferred_spectrum(&unit).unwrap();
        assert_eq!(source, SpectrumSource::Outlet);
        assert_eq!(bands.band(0), Some(82.0));
    }

    #[test]
    fn malformed_outlet_falls_through() {
        let mut unit = MechanicalUnitDef::new("u1", "AHU-1", "AHU");
        unit.outlet_spectrum_json = Some("{broken".into());
        unit.inlet_spectrum_json = Some(OUTLET.to_string());
        assert_eq!(preferred_spectrum(&unit).unwrap().0, SpectrumSource::Inlet);
        unit.inlet_spectrum_json = Some("{}".into());
        assert!(preferred_spectrum(&unit).is_none());
    }
}

//! Typed path data and engine output.

use dn_core::{OctaveBands, as_sq_ft, circular_area, rectangular_area};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Noise source at the head of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub component_type: String,
    /// Overall level (dBA).
    pub noise_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub octave_band_levels: Option<OctaveBands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuctShape {
    Rectangular,
    Circular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingSpec {
    pub fitting_type: String,
    /// dB added (positive) or removed (negative) at this fitting.
    pub noise_adjustment: f64,
    /// Distance from the segment start (ft).
    pub position: f64,
}

/// Coarse fitting category the engine uses to pick an insertion-loss model.
/// Serialized as the bare label; the fitting names themselves travel in
/// `SegmentSpec::fittings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FittingClass {
    Elbow,
    Junction,
    /// Neither elbow nor junction; the engine looks at the fitting names.
    Specific,
}

impl FittingClass {
    pub fn as_str(self) -> &'static str {
        match self {
            FittingClass::Elbow => "elbow",
            FittingClass::Junction => "junction",
            FittingClass::Specific => "specific",
        }
    }

    /// Classify a segment by the names of its fittings. Elbows take
    /// precedence over junctions; any other named fitting is specific.
    pub fn infer<'a, I>(fitting_types: I) -> Option<FittingClass>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<String> = fitting_types
            .into_iter()
            .map(|n| n.trim().to_ascii_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        if names.iter().any(|n| n.contains("elbow") || n.contains("bend")) {
            return Some(FittingClass::Elbow);
        }
        const JUNCTION_WORDS: [&str; 5] = ["junction", "tee", "wye", "branch", "takeoff"];
        if names
            .iter()
            .any(|n| JUNCTION_WORDS.iter().any(|w| n.contains(w)))
        {
            return Some(FittingClass::Junction);
        }
        (!names.is_empty()).then_some(FittingClass::Specific)
    }
}

/// One duct segment of the ordered path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub element_id: String,
    /// Length (ft).
    pub length: f64,
    #[serde(default)]
    pub duct_width: Option<f64>,
    #[serde(default)]
    pub duct_height: Option<f64>,
    #[serde(default)]
    pub diameter: Option<f64>,
    pub duct_shape: DuctShape,
    pub duct_type: String,
    #[serde(default)]
    pub insulation: Option<String>,
    #[serde(default)]
    pub lining_thickness: f64,
    /// Airflow (CFM).
    pub flow_rate: f64,
    /// Air velocity (FPM).
    pub flow_velocity: f64,
    #[serde(default)]
    pub fittings: Vec<FittingSpec>,
    #[serde(default, rename = "fitting_type")]
    pub fitting_class: Option<FittingClass>,
}

impl SegmentSpec {
    /// Cross-section (ft²), or `None` when the shape's dimensions are missing.
    pub fn area_sq_ft(&self) -> Option<f64> {
        match self.duct_shape {
            DuctShape::Rectangular => {
                let (w, h) = (self.duct_width?, self.duct_height?);
                Some(as_sq_ft(rectangular_area(w, h)))
            }
            DuctShape::Circular => self.diameter.map(|d| as_sq_ft(circular_area(d))),
        }
    }

    fn check(&self) -> EngineResult<()> {
        let numbers = [
            ("length", Some(self.length)),
            ("duct_width", self.duct_width),
            ("duct_height", self.duct_height),
            ("diameter", self.diameter),
            ("lining_thickness", Some(self.lining_thickness)),
            ("flow_rate", Some(self.flow_rate)),
            ("flow_velocity", Some(self.flow_velocity)),
        ];
        for (name, value) in numbers {
            if let Some(v) = value
                && !v.is_finite()
            {
                return Err(EngineError::InvalidInput {
                    what: format!("segment {} has non-finite {name}", self.element_id),
                });
            }
        }
        if self.area_sq_ft().is_none() {
            return Err(EngineError::InvalidInput {
                what: format!("segment {} lacks dimensions for its shape", self.element_id),
            });
        }
        for fitting in &self.fittings {
            if !fitting.noise_adjustment.is_finite() || !fitting.position.is_finite() {
                return Err(EngineError::InvalidInput {
                    what: format!(
                        "fitting {} on segment {} has a non-finite value",
                        fitting.fitting_type, self.element_id
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Receiving end of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalSpec {
    pub component_type: String,
    pub noise_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
}

/// Complete input for one path, segments in source → terminal order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathData {
    #[serde(default)]
    pub source_component: Option<SourceSpec>,
    #[serde(default)]
    pub segments: Vec<SegmentSpec>,
    #[serde(default)]
    pub terminal_component: Option<TerminalSpec>,
}

impl PathData {
    /// Reject values no engine can work with (non-finite numbers, a shape
    /// without its dimensions). Missing source or terminal is not checked
    /// here; that is a validation concern.
    pub fn check(&self) -> EngineResult<()> {
        if let Some(source) = &self.source_component
            && !source.noise_level.is_finite()
        {
            return Err(EngineError::InvalidInput {
                what: "source noise level is not finite".to_string(),
            });
        }
        if let Some(terminal) = &self.terminal_component
            && !terminal.noise_level.is_finite()
        {
            return Err(EngineError::InvalidInput {
                what: "terminal noise level is not finite".to_string(),
            });
        }
        self.segments.iter().try_for_each(SegmentSpec::check)
    }
}

/// Per-element breakdown reported by an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementResult {
    pub element_order: usize,
    pub element_type: String,
    pub element_id: String,
    pub noise_before: f64,
    pub noise_after_dba: f64,
    #[serde(default)]
    pub nc_rating: u8,
    #[serde(default)]
    pub attenuation_dba: f64,
    #[serde(default)]
    pub generated_dba: f64,
    #[serde(default)]
    pub attenuation_spectrum: Option<OctaveBands>,
    #[serde(default)]
    pub generated_spectrum: Option<OctaveBands>,
    #[serde(default)]
    pub noise_after_spectrum: Option<OctaveBands>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    pub calculation_valid: bool,
    pub source_noise: f64,
    pub terminal_noise: f64,
    pub total_attenuation: f64,
    pub nc_rating: u8,
    #[serde(default)]
    pub octave_band_spectrum: Option<OctaveBands>,
    #[serde(default)]
    pub path_segments: Vec<ElementResult>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duct(id: &str) -> SegmentSpec {
        SegmentSpec {
            element_id: id.to_string(),
            length: 20.0,
            duct_width: Some(12.0),
            duct_height: Some(8.0),
            diameter: None,
            duct_shape: DuctShape::Rectangular,
            duct_type: "sheet_metal".to_string(),
            insulation: None,
            lining_thickness: 0.0,
            flow_rate: 533.3,
            flow_velocity: 800.0,
            fittings: Vec::new(),
            fitting_class: None,
        }
    }

    #[test]
    fn fitting_classes() {
        assert_eq!(FittingClass::infer(["Elbow 90", "tee"]), Some(FittingClass::Elbow));
        assert_eq!(FittingClass::infer(["Branch Tee"]), Some(FittingClass::Junction));
        assert_eq!(FittingClass::infer(["Volume Damper"]), Some(FittingClass::Specific));
        assert_eq!(FittingClass::infer(["  "]), None);
        assert_eq!(FittingClass::infer(Vec::<&str>::new()), None);
    }

    #[test]
    fn area_by_shape() {
        let rect = duct("s1");
        assert!((rect.area_sq_ft().unwrap() - 96.0 / 144.0).abs() < 1e-9);

        let mut round = duct("s2");
        round.duct_shape = DuctShape::Circular;
        assert!(round.area_sq_ft().is_none());
        round.diameter = Some(12.0);
        assert!((round.area_sq_ft().unwrap() - std::f64::consts::PI * 36.0 / 144.0).abs() < 1e-9);
    }

    #[test]
    fn check_rejects_non_finite() {
        let mut data = PathData {
            source_component: Some(SourceSpec {
                component_type: "ahu".to_string(),
                noise_level: 72.0,
                octave_band_levels: None,
            }),
            segments: vec![duct("s1")],
            terminal_component: None,
        };
        assert!(data.check().is_ok());
        data.segments[0].flow_rate = f64::NAN;
        assert!(matches!(data.check(), Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn contract_field_names() {
        let mut seg = duct("s1");
        seg.fitting_class = Some(FittingClass::Elbow);
        let json = serde_json::to_value(PathData {
            source_component: None,
            segments: vec![seg],
            terminal_component: None,
        })
        .unwrap();
        assert_eq!(json["segments"][0]["fitting_type"], "elbow");
        assert_eq!(json["segments"][0]["duct_shape"], "rectangular");
        assert!(json["source_component"].is_null());
    }

    #[test]
    fn specific_fittings_serialize_as_a_bare_label() {
        let mut seg = duct("s1");
        seg.fittings.push(FittingSpec {
            fitting_type: "volume_damper".to_string(),
            noise_adjustment: 2.0,
            position: 3.0,
        });
        seg.fitting_class = FittingClass::infer(seg.fittings.iter().map(|f| f.fitting_type.as_str()));
        let json = serde_json::to_value(&seg).unwrap();
        assert_eq!(json["fitting_type"], FittingClass::Specific.as_str());
        assert_eq!(json["fittings"][0]["fitting_type"], "volume_damper");

        let back: SegmentSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back.fitting_class, Some(FittingClass::Specific));
    }
}

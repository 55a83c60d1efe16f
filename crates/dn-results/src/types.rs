//! Result data types.

use dn_core::OctaveBands;
use dn_engine::{ElementResult, EngineOutput};
use serde::{Deserialize, Serialize};

pub type AnalysisId = String;

/// One element of the per-path breakdown, in path order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    pub element_order: usize,
    pub element_type: String,
    pub element_id: String,
    pub noise_before_dba: f64,
    pub noise_after_dba: f64,
    pub attenuation_dba: f64,
    pub generated_dba: f64,
    pub nc_rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_after_spectrum: Option<OctaveBands>,
}

impl From<&ElementResult> for SegmentResult {
    fn from(e: &ElementResult) -> Self {
        Self {
            element_order: e.element_order,
            element_type: e.element_type.clone(),
            element_id: e.element_id.clone(),
            noise_before_dba: e.noise_before,
            noise_after_dba: e.noise_after_dba,
            attenuation_dba: e.attenuation_dba,
            generated_dba: e.generated_dba,
            nc_rating: e.nc_rating,
            noise_after_spectrum: e.noise_after_spectrum,
        }
    }
}

/// Outcome of analysing one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathAnalysisResult {
    pub path_id: String,
    pub path_name: String,
    pub source_noise: f64,
    pub terminal_noise: f64,
    pub total_attenuation: f64,
    pub nc_rating: u8,
    pub calculation_valid: bool,
    #[serde(default)]
    pub segment_results: Vec<SegmentResult>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub octave_band_spectrum: Option<OctaveBands>,
}

impl PathAnalysisResult {
    /// A result for a path that could not be calculated.
    pub fn failed(path_id: &str, path_name: &str, message: impl Into<String>) -> Self {
        Self {
            path_id: path_id.to_string(),
            path_name: path_name.to_string(),
            source_noise: 0.0,
            terminal_noise: 0.0,
            total_attenuation: 0.0,
            nc_rating: 0,
            calculation_valid: false,
            segment_results: Vec::new(),
            warnings: Vec::new(),
            error_message: Some(message.into()),
            octave_band_spectrum: None,
        }
    }

    /// Wrap an engine output.
    pub fn from_engine(path_id: &str, path_name: &str, output: &EngineOutput) -> Self {
        Self {
            path_id: path_id.to_string(),
            path_name: path_name.to_string(),
            source_noise: output.source_noise,
            terminal_noise: output.terminal_noise,
            total_attenuation: output.total_attenuation,
            nc_rating: output.nc_rating,
            calculation_valid: output.calculation_valid,
            segment_results: output.path_segments.iter().map(SegmentResult::from).collect(),
            warnings: output.warnings.clone(),
            error_message: output.error.clone(),
            octave_band_spectrum: output.octave_band_spectrum,
        }
    }
}

/// A stored analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub analysis_id: AnalysisId,
    pub path_id: String,
    pub timestamp: String,
    pub engine_version: String,
    pub result: PathAnalysisResult,
}

impl AnalysisRecord {
    /// Stamp a result with the current UTC time.
    pub fn new(analysis_id: AnalysisId, engine_version: &str, result: PathAnalysisResult) -> Self {
        Self {
            analysis_id,
            path_id: result.path_id.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            engine_version: engine_version.to_string(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_output_maps_to_result() {
        let output = EngineOutput {
            calculation_valid: true,
            source_noise: 72.0,
            terminal_noise: 38.0,
            total_attenuation: 34.0,
            nc_rating: 35,
            octave_band_spectrum: None,
            path_segments: vec![ElementResult {
                element_order: 1,
                element_type: "duct".to_string(),
                element_id: "s-1".to_string(),
                noise_before: 72.0,
                noise_after_dba: 60.0,
                nc_rating: 50,
                attenuation_dba: 12.0,
                generated_dba: 0.0,
                attenuation_spectrum: None,
                generated_spectrum: None,
                noise_after_spectrum: None,
            }],
            warnings: vec!["check".to_string()],
            error: None,
        };
        let result = PathAnalysisResult::from_engine("p-1", "Supply", &output);
        assert!(result.calculation_valid);
        assert_eq!(result.segment_results[0].noise_before_dba, 72.0);
        assert_eq!(result.warnings, vec!["check".to_string()]);

        let failed = PathAnalysisResult::failed("p-1", "Supply", "no source");
        assert!(!failed.calculation_valid);
        assert_eq!(failed.error_message.as_deref(), Some("no source"));
    }
}

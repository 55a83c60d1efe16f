//! Per-element validators over assembled path data.

use dn_core::{ValidationResult, ensure_finite};
use dn_engine::{DuctShape, FittingSpec, SegmentSpec, SourceSpec, TerminalSpec};

use crate::bounds::{
    AIRFLOW_RANGE_CFM, MAX_FITTING_ADJUSTMENT_DB, MAX_SEGMENT_LENGTH_FT, RECT_DIMENSION_RANGE_IN,
    ROUND_DIAMETER_RANGE_IN, SOURCE_LEVEL_RANGE_DBA, VELOCITY_RANGE_FPM, outside,
};
use crate::error::ValidateFault;
use crate::guard::guarded;

/// One element of an assembled path.
#[derive(Debug, Clone, Copy)]
pub enum PathElement<'a> {
    Source(&'a SourceSpec),
    Duct(&'a SegmentSpec),
    Fitting(&'a FittingSpec),
    Terminal(&'a TerminalSpec),
}

pub fn validate_path_element(element: PathElement<'_>) -> ValidationResult {
    match element {
        PathElement::Source(source) => validate_source_element(source),
        PathElement::Duct(segment) => validate_duct_element(segment),
        PathElement::Fitting(fitting) => validate_fitting_element(fitting),
        PathElement::Terminal(terminal) => validate_terminal_element(terminal),
    }
}

pub fn validate_source_element(source: &SourceSpec) -> ValidationResult {
    guarded("validate_source_element", |r| {
        let level = ensure_finite(source.noise_level, "source noise level")?;
        if outside(level, SOURCE_LEVEL_RANGE_DBA) {
            r.add_warning(format!(
                "Source noise level {level:.1} dBA is outside {}-{} dBA",
                SOURCE_LEVEL_RANGE_DBA.0, SOURCE_LEVEL_RANGE_DBA.1
            ));
        }
        if source.component_type.trim().is_empty() {
            r.add_warning("Source component type is blank".to_string());
        }
        if let Some(bands) = &source.octave_band_levels {
            if bands.is_silent() {
                r.add_warning("Source spectrum is all zeros".to_string());
            } else if bands.levels().iter().any(|&v| v < 0.0 || v > SOURCE_LEVEL_RANGE_DBA.1) {
                r.add_warning("Source spectrum has bands outside 0-140 dB".to_string());
            }
        }
        Ok(())
    })
}

/// Geometry, flow and velocity of one duct segment, plus its fittings.
///
/// Velocity is derived as CFM / ft² and compared against the typical
/// 100-6000 FPM band.
pub fn validate_duct_element(segment: &SegmentSpec) -> ValidationResult {
    guarded("validate_duct_element", |r| {
        let id = &segment.element_id;
        let length = ensure_finite(segment.length, "segment length")?;
        if length <= 0.0 {
            r.add_error(format!("Segment {id} length must be positive"));
        } else if length > MAX_SEGMENT_LENGTH_FT {
            r.add_warning(format!("Segment {id} is unusually long ({length:.0} ft)"));
        }

        let (dims, range) = match segment.duct_shape {
            DuctShape::Rectangular => (
                vec![("width", segment.duct_width), ("height", segment.duct_height)],
                RECT_DIMENSION_RANGE_IN,
            ),
            DuctShape::Circular => (vec![("diameter", segment.diameter)], ROUND_DIAMETER_RANGE_IN),
        };
        for (name, value) in dims {
            let value = value.ok_or_else(|| ValidateFault::Missing {
                what: format!("segment {id} {name}"),
            })?;
            let value = ensure_finite(value, "duct dimension")?;
            if value <= 0.0 {
                r.add_error(format!("Segment {id} {name} must be positive"));
            } else if outside(value, range) {
                r.add_warning(format!(
                    "Segment {id} {name} {value} in is outside {}-{} in",
                    range.0, range.1
                ));
            }
        }

        let flow = ensure_finite(segment.flow_rate, "segment flow rate")?;
        if flow <= 0.0 {
            r.add_error(format!("Segment {id} has no airflow"));
        } else {
            if outside(flow, AIRFLOW_RANGE_CFM) {
                r.add_warning(format!("Segment {id} airflow {flow:.0} CFM is outside the typical range"));
            }
            if let Some(area) = segment.area_sq_ft()
                && area > 0.0
            {
                let velocity = flow / area;
                if outside(velocity, VELOCITY_RANGE_FPM) {
                    r.add_warning(format!(
                        "Segment {id} velocity {velocity:.0} FPM is outside {}-{} FPM",
                        VELOCITY_RANGE_FPM.0, VELOCITY_RANGE_FPM.1
                    ));
                }
            }
        }

        for fitting in &segment.fittings {
            r.merge(validate_fitting_element(fitting));
        }
        Ok(())
    })
}

pub fn validate_fitting_element(fitting: &FittingSpec) -> ValidationResult {
    guarded("validate_fitting_element", |r| {
        if fitting.fitting_type.trim().is_empty() {
            r.add_warning("Fitting has no type".to_string());
        }
        let adj = ensure_finite(fitting.noise_adjustment, "fitting adjustment")?;
        if adj.abs() > MAX_FITTING_ADJUSTMENT_DB {
            r.add_warning(format!(
                "Fitting {} has an extreme noise adjustment ({adj:+.1} dB)",
                fitting.fitting_type
            ));
        }
        if ensure_finite(fitting.position, "fitting position")? < 0.0 {
            r.add_warning(format!("Fitting {} has a negative position", fitting.fitting_type));
        }
        Ok(())
    })
}

pub fn validate_terminal_element(terminal: &TerminalSpec) -> ValidationResult {
    guarded("validate_terminal_element", |r| {
        let level = ensure_finite(terminal.noise_level, "terminal noise level")?;
        if !(0.0..=SOURCE_LEVEL_RANGE_DBA.1).contains(&level) {
            r.add_warning(format!("Terminal noise level {level:.1} dBA is implausible"));
        }
        Ok(())
    })
}

//! Validators over a whole assembled path.

use dn_core::{ValidationResult, spread_ratio};
use dn_engine::PathData;

use crate::bounds::{AREA_SPREAD_INFO, FLOW_SPREAD_WARN, VELOCITY_MISMATCH};
use crate::element::{PathElement, validate_path_element};
use crate::guard::guarded;

/// Range sanity of every element. Never blocks a calculation on its own
/// except for values no engine can use (non-positive length or airflow).
pub fn validate_calculation_ranges(data: &PathData) -> ValidationResult {
    guarded("validate_calculation_ranges", |r| {
        if let Some(source) = &data.source_component {
            r.merge(validate_path_element(PathElement::Source(source)));
        }
        for segment in &data.segments {
            r.merge(validate_path_element(PathElement::Duct(segment)));
        }
        if let Some(terminal) = &data.terminal_component {
            r.merge(validate_path_element(PathElement::Terminal(terminal)));
        }
        Ok(())
    })
}

/// Relationships between values of the same segment.
pub fn validate_physical_constraints(data: &PathData) -> ValidationResult {
    guarded("validate_physical_constraints", |r| {
        for segment in &data.segments {
            let id = &segment.element_id;
            let smallest = [segment.duct_width, segment.duct_height, segment.diameter]
                .into_iter()
                .flatten()
                .fold(f64::INFINITY, f64::min);
            if smallest.is_finite() && segment.lining_thickness * 2.0 >= smallest {
                r.add_error(format!(
                    "Segment {id} lining ({} in) closes the duct cross-section",
                    segment.lining_thickness
                ));
            }

            if let Some(area) = segment.area_sq_ft()
                && area > 0.0
                && segment.flow_velocity > 0.0
            {
                let derived = segment.flow_rate / area;
                if (derived - segment.flow_velocity).abs() > VELOCITY_MISMATCH * segment.flow_velocity {
                    r.add_warning(format!(
                        "Segment {id} velocity {:.0} FPM disagrees with flow / area ({derived:.0} FPM)",
                        segment.flow_velocity
                    ));
                }
            }

            for fitting in &segment.fittings {
                if fitting.position > segment.length {
                    r.add_warning(format!(
                        "Fitting {} on segment {id} lies beyond the segment end",
                        fitting.fitting_type
                    ));
                }
            }
        }
        Ok(())
    })
}

/// Consistency across segments: airflow should be roughly conserved along a
/// single run, and cross-sections rarely change drastically.
pub fn validate_path_consistency(data: &PathData) -> ValidationResult {
    guarded("validate_path_consistency", |r| {
        let flows: Vec<f64> = data
            .segments
            .iter()
            .map(|s| s.flow_rate)
            .filter(|f| *f > 0.0)
            .collect();
        if let Some(spread) = spread_ratio(&flows)
            && spread > FLOW_SPREAD_WARN
        {
            r.add_warning(format!(
                "Flow rate varies by {:.0}% across path segments",
                spread * 100.0
            ));
        }

        let areas: Vec<f64> = data.segments.iter().filter_map(|s| s.area_sq_ft()).collect();
        if let Some(spread) = spread_ratio(&areas)
            && spread > AREA_SPREAD_INFO
        {
            r.add_info(format!(
                "Duct cross-section varies by {:.0}% across path segments",
                spread * 100.0
            ));
        }
        Ok(())
    })
}

/// Gate for a calculation: a source and at least one segment are required,
/// a terminal is expected. Runs every other calculation validator.
pub fn validate_calculation_inputs(data: &PathData) -> ValidationResult {
    guarded("validate_calculation_inputs", |r| {
        if data.source_component.is_none() {
            r.add_error("Missing source component".to_string());
        }
        if data.segments.is_empty() {
            r.add_error("Path has no segments".to_string());
        }
        if data.terminal_component.is_none() {
            r.add_warning("Missing terminal component; results stop at the last segment".to_string());
        }
        r.merge(validate_calculation_ranges(data));
        r.merge(validate_physical_constraints(data));
        r.merge(validate_path_consistency(data));
        Ok(())
    })
}

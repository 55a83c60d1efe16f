//! Validators over project snapshot records.

use dn_catalog::{DEFAULT_UNIT_DBA, preferred_spectrum};
use dn_core::{ValidationResult, ensure_finite};
use dn_graph::{Connectivity, DuctEdge};
use dn_project::{DuctShapeDef, PathDef, Project, SegmentDef};

use crate::bounds::{
    AIRFLOW_RANGE_CFM, MAX_FITTING_ADJUSTMENT_DB, MAX_SEGMENT_LENGTH_FT, RECT_DIMENSION_RANGE_IN,
    ROUND_DIAMETER_RANGE_IN, VELOCITY_RANGE_FPM, outside,
};
use crate::guard::guarded;

/// Check one stored segment: connection, length, shape dimensions, stored
/// flow and velocity, fitting adjustments.
pub fn validate_segment(segment: &SegmentDef) -> ValidationResult {
    guarded("validate_segment", |r| {
        let id = &segment.id;
        if segment.from_component_id.is_none() && segment.to_component_id.is_none() {
            r.add_error(format!(
                "Segment {id} must be connected to at least one component"
            ));
        }

        let length = ensure_finite(segment.length_ft, "segment length")?;
        if length <= 0.0 {
            r.add_error(format!("Segment {id} length must be positive (got {length} ft)"));
        } else if length > MAX_SEGMENT_LENGTH_FT {
            r.add_warning(format!("Segment {id} is unusually long ({length:.0} ft)"));
        }

        match segment.shape {
            DuctShapeDef::Rectangular {
                width_in,
                height_in,
            } => {
                for (name, value) in [("width", width_in), ("height", height_in)] {
                    let value = ensure_finite(value, "duct dimension")?;
                    if value <= 0.0 {
                        r.add_error(format!("Segment {id} {name} must be positive"));
                    } else if outside(value, RECT_DIMENSION_RANGE_IN) {
                        r.add_warning(format!(
                            "Segment {id} {name} {value} in is outside {}-{} in",
                            RECT_DIMENSION_RANGE_IN.0, RECT_DIMENSION_RANGE_IN.1
                        ));
                    }
                }
            }
            DuctShapeDef::Circular { diameter_in } => {
                let d = ensure_finite(diameter_in, "duct diameter")?;
                if d <= 0.0 {
                    r.add_error(format!("Segment {id} diameter must be positive"));
                } else if outside(d, ROUND_DIAMETER_RANGE_IN) {
                    r.add_warning(format!(
                        "Segment {id} diameter {d} in is outside {}-{} in",
                        ROUND_DIAMETER_RANGE_IN.0, ROUND_DIAMETER_RANGE_IN.1
                    ));
                }
            }
        }

        if ensure_finite(segment.lining_thickness_in, "lining thickness")? < 0.0 {
            r.add_error(format!("Segment {id} lining thickness cannot be negative"));
        }
        if let Some(flow) = segment.flow_rate_cfm
            && outside(ensure_finite(flow, "segment flow rate")?, AIRFLOW_RANGE_CFM)
        {
            r.add_warning(format!("Segment {id} airflow {flow:.0} CFM is outside the typical range"));
        }
        if let Some(velocity) = segment.velocity_fpm
            && outside(ensure_finite(velocity, "segment velocity")?, VELOCITY_RANGE_FPM)
        {
            r.add_warning(format!("Segment {id} velocity {velocity:.0} FPM is outside the typical range"));
        }

        for fitting in &segment.fittings {
            if let Some(adj) = fitting.noise_adjustment_db
                && ensure_finite(adj, "fitting adjustment")?.abs() > MAX_FITTING_ADJUSTMENT_DB
            {
                r.add_warning(format!(
                    "Fitting {} on segment {id} has an extreme noise adjustment ({adj:+.1} dB)",
                    fitting.fitting_type
                ));
            }
            if fitting.position_ft < 0.0 || fitting.position_ft > length.max(0.0) {
                r.add_warning(format!(
                    "Fitting {} on segment {id} sits outside the segment",
                    fitting.fitting_type
                ));
            }
        }
        Ok(())
    })
}

/// Naive source/sink detection over the raw component adjacency of a set of
/// segments.
///
/// Advisory: branches and disconnections look alike here, so most findings
/// are warnings or notes. Floating segments are errors.
pub fn validate_segment_connectivity<E: DuctEdge>(segments: &[E]) -> ValidationResult {
    guarded("validate_segment_connectivity", |r| {
        if segments.is_empty() {
            return Ok(());
        }
        let conn = Connectivity::analyze(segments);

        for key in &conn.floating_segments {
            r.add_error(format!("Segment {key} is not connected to any component"));
        }
        let connected = segments.len() > conn.floating_segments.len();
        match conn.sources.len() {
            0 if connected => r.add_warning(
                "No source component found; the path may form a loop".to_string(),
            ),
            0 | 1 => {}
            n => r.add_info(format!(
                "Multiple sources detected ({n}): {}",
                conn.sources.join(", ")
            )),
        }
        match conn.sinks.len() {
            0 if connected => r.add_warning("No terminal component found".to_string()),
            0 | 1 => {}
            n => r.add_info(format!(
                "Multiple terminals detected ({n}): {}",
                conn.sinks.join(", ")
            )),
        }
        for node in &conn.branch_points {
            r.add_warning(format!(
                "Component {node} branches; only its first outgoing segment is followed"
            ));
        }
        Ok(())
    })
}

/// Check the mechanical unit linked to a path, if any.
pub fn validate_mechanical_unit_connection(project: &Project, path: &PathDef) -> ValidationResult {
    guarded("validate_mechanical_unit_connection", |r| {
        let Some(unit_id) = path.mechanical_unit_id.as_deref() else {
            return Ok(());
        };
        let Some(unit) = project.mechanical_unit(unit_id) else {
            r.add_error(format!(
                "Mechanical unit {unit_id} linked to path {} not found",
                path.id
            ));
            return Ok(());
        };

        if let Some(airflow) = unit.airflow_cfm
            && outside(ensure_finite(airflow, "unit airflow")?, AIRFLOW_RANGE_CFM)
        {
            r.add_warning(format!(
                "Mechanical unit {} airflow {airflow:.0} CFM is outside {}-{} CFM",
                unit.name, AIRFLOW_RANGE_CFM.0, AIRFLOW_RANGE_CFM.1
            ));
        }
        if preferred_spectrum(unit).is_none() {
            match unit.base_noise_dba {
                Some(level) => r.add_info(format!(
                    "Mechanical unit {} has no usable spectrum; using its base level {level:.1} dBA",
                    unit.name
                )),
                None => r.add_info(format!(
                    "Mechanical unit {} has no spectrum or base level; assuming {DEFAULT_UNIT_DBA:.1} dBA",
                    unit.name
                )),
            }
        }
        Ok(())
    })
}

/// Check a stored path and everything it references.
pub fn validate_path(project: &Project, path_id: &str) -> ValidationResult {
    guarded("validate_path", |r| {
        let Some(path) = project.path(path_id) else {
            r.add_error(format!("Path {path_id} not found"));
            return Ok(());
        };
        if path.segment_ids.is_empty() {
            r.add_error(format!("Path {path_id} has no segments"));
        }

        let mut segments = Vec::with_capacity(path.segment_ids.len());
        for id in &path.segment_ids {
            match project.segment(id) {
                Some(segment) => {
                    r.merge(validate_segment(segment));
                    segments.push(segment);
                }
                None => r.add_error(format!("Segment {id} in path {path_id} not found")),
            }
        }

        if let Some(source_id) = path.primary_source_id.as_deref() {
            match project.component(source_id) {
                None => r.add_error(format!("Primary source component {source_id} not found")),
                Some(c) if !c.kind.is_source() => r.add_warning(format!(
                    "Primary source {} is a {}, not a noise source",
                    c.name, c.kind
                )),
                Some(_) => {}
            }
        }
        match path.terminal_component_id.as_deref() {
            Some(id) if project.component(id).is_none() => {
                r.add_error(format!("Terminal component {id} not found"));
            }
            Some(_) => {}
            None => r.add_info(format!(
                "Path {path_id} has no terminal; the last segment's downstream component is used"
            )),
        }
        if let Some(space_id) = path.target_space_id.as_deref()
            && project.space(space_id).is_none()
        {
            r.add_warning(format!("Target space {space_id} not found"));
        }

        r.merge(validate_mechanical_unit_connection(project, path));
        r.merge(validate_segment_connectivity(&segments));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dn_project::{ComponentDef, ComponentType, FittingDef, MechanicalUnitDef, PositionDef};

    fn component(id: &str, kind: ComponentType) -> ComponentDef {
        ComponentDef {
            id: id.to_string(),
            name: id.to_uppercase(),
            kind,
            position: PositionDef { x: 0.0, y: 0.0 },
            noise_level_dba: None,
            flow_rate_cfm: None,
        }
    }

    fn project() -> Project {
        let mut p = Project::new("validate");
        p.components = vec![
            component("ahu", ComponentType::Ahu),
            component("j", ComponentType::Junction),
            component("d", ComponentType::Diffuser),
        ];
        p.segments = vec![
            SegmentDef::rectangular("s1", Some("ahu"), Some("j"), 20.0, 24.0, 12.0),
            SegmentDef::rectangular("s2", Some("j"), Some("d"), 12.0, 12.0, 8.0),
        ];
        let mut path = dn_project::PathDef::new("p1", "Supply", &["s1", "s2"]);
        path.primary_source_id = Some("ahu".into());
        path.terminal_component_id = Some("d".into());
        p.paths.push(path);
        p
    }

    #[test]
    fn unconnected_segment_needs_a_connection() {
        let seg = SegmentDef::rectangular("s9", None, None, 10.0, 12.0, 8.0);
        let result = validate_segment(&seg);
        assert!(!result.is_valid());
        assert!(result.errors()[0].contains("must be connected to at least one component"));
    }

    #[test]
    fn segment_bounds() {
        let mut seg = SegmentDef::rectangular("s1", Some("a"), None, 600.0, 2.0, 8.0);
        seg.fittings.push(FittingDef {
            fitting_type: "elbow".into(),
            position_ft: 5.0,
            noise_adjustment_db: Some(25.0),
        });
        let result = validate_segment(&seg);
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 3);

        seg.length_ft = 0.0;
        let result = validate_segment(&seg);
        assert!(!result.is_valid());
    }

    #[test]
    fn non_finite_length_is_a_structural_error() {
        let seg = SegmentDef::rectangular("s1", Some("a"), Some("b"), f64::NAN, 12.0, 8.0);
        let result = validate_segment(&seg);
        assert!(!result.is_valid());
        assert!(result.errors()[0].starts_with("Validation error in validate_segment"));
    }

    #[test]
    fn connectivity_findings() {
        let p = project();
        let clean = validate_segment_connectivity(&p.segments);
        assert!(clean.is_empty());

        let mut branched = p.segments.clone();
        branched.push(SegmentDef::rectangular("s3", Some("j"), Some("d2"), 8.0, 10.0, 8.0));
        let result = validate_segment_connectivity(&branched);
        assert!(result.is_valid());
        assert!(result.warnings()[0].contains("Component j branches"));
        assert!(result.info()[0].starts_with("Multiple terminals"));

        let looped = vec![
            SegmentDef::rectangular("a", Some("x"), Some("y"), 5.0, 10.0, 8.0),
            SegmentDef::rectangular("b", Some("y"), Some("x"), 5.0, 10.0, 8.0),
        ];
        let result = validate_segment_connectivity(&looped);
        assert!(result.warnings().iter().any(|w| w.contains("loop")));
    }

    #[test]
    fn valid_path() {
        let p = project();
        let result = validate_path(&p, "p1");
        assert!(result.is_valid(), "{result}");
        assert!(!result.has_warnings());
    }

    #[test]
    fn path_with_dangling_references() {
        let mut p = project();
        {
            let path = p.path_mut("p1").unwrap();
            path.segment_ids.push("s-missing".into());
            path.mechanical_unit_id = Some("mu-x".into());
            path.target_space_id = Some("sp-x".into());
        }
        let result = validate_path(&p, "p1");
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 2);
        assert!(result.warnings().iter().any(|w| w.contains("sp-x")));

        assert!(!validate_path(&p, "nope").is_valid());
    }

    #[test]
    fn mechanical_unit_checks() {
        let mut p = project();
        let mut unit = MechanicalUnitDef::new("mu-1", "AHU-1", "AHU");
        unit.airflow_cfm = Some(75_000.0);
        p.mechanical_units.push(unit);
        let path = p.path_mut("p1").unwrap();
        path.mechanical_unit_id = Some("mu-1".into());
        let path = p.path("p1").unwrap().clone();

        let result = validate_mechanical_unit_connection(&p, &path);
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
        assert!(result.info()[0].contains("assuming 50.0 dBA"));
    }
}

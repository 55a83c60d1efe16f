//! Structural project validation.
//!
//! This is the strict, fail-fast check applied on load and save: unique ids
//! and references between records. Engineering sanity (lengths, velocities,
//! airflow bounds) is left to the accumulating validators in `dn-validate`.
//! Mechanical units are re-imported from schedules independently of the
//! drawing, so a path's link to one is not checked here.

use crate::schema::{ComponentDef, DuctShapeDef, PathDef, Project, SegmentDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let component_ids = unique_ids(project.components.iter().map(|c| &c.id), "components")?;
    for component in &project.components {
        validate_component(component)?;
    }

    let segment_ids = unique_ids(project.segments.iter().map(|s| &s.id), "segments")?;
    for segment in &project.segments {
        validate_segment(segment, &component_ids)?;
    }

    unique_ids(project.mechanical_units.iter().map(|u| &u.id), "mechanical_units")?;
    let space_ids = unique_ids(project.spaces.iter().map(|s| &s.id), "spaces")?;

    unique_ids(project.paths.iter().map(|p| &p.id), "paths")?;
    for path in &project.paths {
        validate_path(path, &component_ids, &segment_ids, &space_ids)?;
    }

    Ok(())
}

fn unique_ids<'a>(
    ids: impl Iterator<Item = &'a String>,
    context: &str,
) -> Result<HashSet<&'a String>, ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                id: id.clone(),
                context: context.to_string(),
            });
        }
    }
    Ok(seen)
}

fn validate_component(component: &ComponentDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("component '{}' {}", component.name, name);
    validate_finite(&field("position.x"), component.position.x)?;
    validate_finite(&field("position.y"), component.position.y)?;
    if let Some(level) = component.noise_level_dba {
        validate_finite(&field("noise_level_dba"), level)?;
    }
    if let Some(flow) = component.flow_rate_cfm {
        validate_finite(&field("flow_rate_cfm"), flow)?;
    }
    Ok(())
}

fn validate_segment(
    segment: &SegmentDef,
    component_ids: &HashSet<&String>,
) -> Result<(), ValidationError> {
    for (end, id) in [
        ("from_component_id", &segment.from_component_id),
        ("to_component_id", &segment.to_component_id),
    ] {
        if let Some(id) = id
            && !component_ids.contains(id)
        {
            return Err(ValidationError::MissingReference {
                id: id.clone(),
                context: format!("segment '{}' {}", segment.id, end),
            });
        }
    }

    let field = |name: &str| format!("segment '{}' {}", segment.id, name);
    validate_finite(&field("length_ft"), segment.length_ft)?;
    match segment.shape {
        DuctShapeDef::Rectangular {
            width_in,
            height_in,
        } => {
            validate_finite(&field("width_in"), width_in)?;
            validate_finite(&field("height_in"), height_in)?;
        }
        DuctShapeDef::Circular { diameter_in } => {
            validate_finite(&field("diameter_in"), diameter_in)?;
        }
    }
    if segment.lining_thickness_in < 0.0 || !segment.lining_thickness_in.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field("lining_thickness_in"),
            value: segment.lining_thickness_in.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    for fitting in &segment.fittings {
        validate_finite(&field("fitting position_ft"), fitting.position_ft)?;
        if let Some(adj) = fitting.noise_adjustment_db {
            validate_finite(&field("fitting noise_adjustment_db"), adj)?;
        }
    }
    Ok(())
}

fn validate_path(
    path: &PathDef,
    component_ids: &HashSet<&String>,
    segment_ids: &HashSet<&String>,
    space_ids: &HashSet<&String>,
) -> Result<(), ValidationError> {
    for id in &path.segment_ids {
        if !segment_ids.contains(id) {
            return Err(ValidationError::MissingReference {
                id: id.clone(),
                context: format!("path '{}' segment_ids", path.name),
            });
        }
    }

    for (field, id) in [
        ("primary_source_id", &path.primary_source_id),
        ("terminal_component_id", &path.terminal_component_id),
    ] {
        if let Some(id) = id
            && !component_ids.contains(id)
        {
            return Err(ValidationError::MissingReference {
                id: id.clone(),
                context: format!("path '{}' {}", path.name, field),
            });
        }
    }

    if let Some(id) = &path.target_space_id
        && !space_ids.contains(id)
    {
        return Err(ValidationError::MissingReference {
            id: id.clone(),
            context: format!("path '{}' target_space_id", path.name),
        });
    }

    Ok(())
}

fn validate_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ComponentType, PositionDef};

    fn component(id: &str) -> ComponentDef {
        ComponentDef {
            id: id.to_string(),
            name: id.to_uppercase(),
            kind: ComponentType::Junction,
            position: PositionDef::default(),
            noise_level_dba: None,
            flow_rate_cfm: None,
        }
    }

    #[test]
    fn duplicate_component_ids_rejected() {
        let mut project = Project::new("p");
        project.components.push(component("a"));
        project.components.push(component("a"));
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn dangling_segment_endpoint_rejected() {
        let mut project = Project::new("p");
        project.components.push(component("a"));
        project
            .segments
            .push(SegmentDef::rectangular("s1", Some("a"), Some("ghost"), 10.0, 12.0, 8.0));
        let err = validate_project(&project).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn path_segment_must_exist() {
        let mut project = Project::new("p");
        project.paths.push(PathDef::new("p1", "Supply", &["s404"]));
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn nan_length_rejected() {
        let mut project = Project::new("p");
        project
            .segments
            .push(SegmentDef::rectangular("s1", None, None, f64::NAN, 12.0, 8.0));
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn future_version_rejected() {
        let mut project = Project::new("p");
        project.version = 99;
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }
}

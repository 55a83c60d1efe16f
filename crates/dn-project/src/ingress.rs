//! Materialising drawn ductwork into project records.
//!
//! The drawing layer hands over components by type and position, and segments
//! whose endpoints are identified the same way (position + type), since drawn
//! objects have no persistent ids yet.

use dn_core::{Tolerances, nearly_equal};
use serde::{Deserialize, Serialize};

use crate::ProjectResult;
use crate::schema::{
    ComponentDef, ComponentType, DuctShapeDef, FittingDef, PathDef, PositionDef, Project,
    SegmentDef,
};
use crate::validate::validate_project;

/// Drawing units within which two positions are the same point.
pub const POSITION_TOLERANCE: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawingPayload {
    #[serde(default)]
    pub components: Vec<DrawnComponent>,
    #[serde(default)]
    pub segments: Vec<DrawnSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawnComponent {
    pub kind: ComponentType,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub noise_level_dba: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EndpointRef {
    pub kind: ComponentType,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawnSegment {
    #[serde(default)]
    pub from: Option<EndpointRef>,
    #[serde(default)]
    pub to: Option<EndpointRef>,
    pub length_ft: f64,
    #[serde(default)]
    pub shape: Option<DuctShapeDef>,
    #[serde(default)]
    pub fittings: Vec<FittingDef>,
}

/// What `materialize` did.
#[derive(Debug, Clone, PartialEq)]
pub struct IngressReport {
    pub path_id: String,
    pub components_created: usize,
    pub components_reused: usize,
    /// Segment endpoints that matched no component (index, "from"/"to").
    pub unmatched_endpoints: Vec<(usize, &'static str)>,
}

/// Drawn ducts without a shape get this section.
const DEFAULT_SHAPE: DuctShapeDef = DuctShapeDef::Rectangular {
    width_in: 12.0,
    height_in: 8.0,
};

/// Add the drawn components and segments to the project and create a path
/// over the new segments. Components already present at the same position
/// with the same type are reused.
///
/// The result is validated as a whole; on error `project` is left unchanged.
pub fn materialize(
    project: &mut Project,
    payload: &DrawingPayload,
    path_name: &str,
) -> ProjectResult<IngressReport> {
    let mut staged = project.clone();
    let report = stage(&mut staged, payload, path_name);
    validate_project(&staged)?;
    *project = staged;
    Ok(report)
}

fn stage(project: &mut Project, payload: &DrawingPayload, path_name: &str) -> IngressReport {
    let mut created = 0;
    let mut reused = 0;

    for drawn in &payload.components {
        if find_component(project, drawn.kind, drawn.x, drawn.y).is_some() {
            reused += 1;
            continue;
        }
        let ordinal = project
            .components
            .iter()
            .filter(|c| c.kind == drawn.kind)
            .count()
            + 1;
        project.components.push(ComponentDef {
            id: new_id(),
            name: drawn
                .name
                .clone()
                .unwrap_or_else(|| format!("{}-{}", drawn.kind.as_str().to_uppercase(), ordinal)),
            kind: drawn.kind,
            position: PositionDef {
                x: drawn.x,
                y: drawn.y,
            },
            noise_level_dba: drawn.noise_level_dba,
            flow_rate_cfm: None,
        });
        created += 1;
    }

    let mut unmatched = Vec::new();
    let mut segment_ids = Vec::with_capacity(payload.segments.len());
    let base_order = project.segments.iter().map(|s| s.order).max().unwrap_or(0);

    for (idx, drawn) in payload.segments.iter().enumerate() {
        let from = resolve_endpoint(project, drawn.from, idx, "from", &mut unmatched);
        let to = resolve_endpoint(project, drawn.to, idx, "to", &mut unmatched);
        let id = new_id();
        project.segments.push(SegmentDef {
            id: id.clone(),
            from_component_id: from,
            to_component_id: to,
            order: base_order + idx as i64 + 1,
            length_ft: drawn.length_ft,
            shape: drawn.shape.unwrap_or(DEFAULT_SHAPE),
            duct_type: Default::default(),
            insulation: None,
            lining_thickness_in: 0.0,
            fittings: drawn.fittings.clone(),
            flow_rate_cfm: None,
            velocity_fpm: None,
        });
        segment_ids.push(id);
    }

    let path_id = new_id();
    let mut path = PathDef::new(&path_id, path_name, &[]);
    path.segment_ids = segment_ids;
    project.paths.push(path);

    IngressReport {
        path_id,
        components_created: created,
        components_reused: reused,
        unmatched_endpoints: unmatched,
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn find_component(project: &Project, kind: ComponentType, x: f64, y: f64) -> Option<&ComponentDef> {
    let tol = Tolerances {
        abs: POSITION_TOLERANCE,
        rel: 0.0,
    };
    project.components.iter().find(|c| {
        c.kind == kind && nearly_equal(c.position.x, x, tol) && nearly_equal(c.position.y, y, tol)
    })
}

fn resolve_endpoint(
    project: &Project,
    endpoint: Option<EndpointRef>,
    idx: usize,
    end: &'static str,
    unmatched: &mut Vec<(usize, &'static str)>,
) -> Option<String> {
    let endpoint = endpoint?;
    match find_component(project, endpoint.kind, endpoint.x, endpoint.y) {
        Some(c) => Some(c.id.clone()),
        None => {
            unmatched.push((idx, end));
            None
        }
    }
}

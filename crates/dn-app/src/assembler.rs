//! Assembly of per-path calculation input.
//!
//! The assembler orders a path's segments, resolves its noise source through
//! three tiers (primary source component, linked mechanical unit, upstream
//! component of the first segment), converts segments to engine specs and
//! attaches a range validation pass. If the records cannot be read cleanly
//! (dangling references, non-finite values) a degraded builder salvages what
//! it can and fills the rest with configured defaults.

use dn_acoustics::calculate_overall_dba;
use dn_catalog::{
    default_fitting_adjustment, default_noise_level, match_unit, preferred_spectrum,
};
use dn_core::{
    ValidationResult, as_cfm, as_sq_ft, circular_area, flow_through, fpm, rectangular_area,
};
use dn_engine::{
    DuctShape, FittingClass, FittingSpec, PathData, SegmentSpec, SourceSpec, TerminalSpec,
};
use dn_project::{ComponentDef, DuctShapeDef, PathDef, Project, SegmentDef};
use dn_validate::validate_calculation_ranges;
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, AssemblyDefaults, DiagnosticsContext};
use crate::error::{AppError, AppResult};

/// Where the source of an assembled path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTier {
    PrimaryComponent,
    MechanicalUnit,
    UpstreamComponent,
    /// Configured default, used by the degraded builder only.
    Fallback,
}

/// Output of one assembly.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// `None` when no usable noise source could be established; the path
    /// cannot be calculated.
    pub data: Option<PathData>,
    pub source_tier: Option<SourceTier>,
    /// Segment ids in resolved source → terminal order.
    pub ordered_segment_ids: Vec<String>,
    pub validation: ValidationResult,
    /// Built by the fallback builder.
    pub degraded: bool,
}

pub struct PathDataAssembler {
    defaults: AssemblyDefaults,
    diagnostics: DiagnosticsContext,
}

impl PathDataAssembler {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            defaults: config.assembly.clone(),
            diagnostics: config.diagnostics.clone(),
        }
    }

    /// Assemble a path. Never fails: a failing primary build falls back to
    /// the degraded builder, and a path with no usable source comes back with
    /// `data == None`.
    pub fn build(&self, project: &Project, path_id: &str) -> Assembly {
        match self.build_primary(project, path_id) {
            Ok(assembly) => assembly,
            Err(err) => {
                warn!(path = path_id, error = %err, "primary assembly failed, using fallback builder");
                self.build_fallback(project, path_id, &err)
            }
        }
    }

    fn build_primary(&self, project: &Project, path_id: &str) -> AppResult<Assembly> {
        let path = project
            .path(path_id)
            .ok_or_else(|| AppError::PathNotFound(path_id.to_string()))?;

        let stored = path
            .segment_ids
            .iter()
            .map(|id| {
                project
                    .segment(id)
                    .ok_or_else(|| AppError::SegmentNotFound(id.clone()))
            })
            .collect::<AppResult<Vec<&SegmentDef>>>()?;
        let ordered: Vec<&SegmentDef> = dn_graph::order(&stored, path.primary_source_id.as_deref())
            .into_iter()
            .copied()
            .collect();

        let source = self.resolve_source(project, path, &ordered)?;
        let segments: Vec<SegmentSpec> = ordered.iter().map(|s| self.segment_spec(s)).collect();
        let terminal = self.resolve_terminal(project, path, &ordered)?;

        let data = PathData {
            source_component: source.as_ref().map(|(spec, _)| spec.clone()),
            segments,
            terminal_component: terminal,
        };
        data.check()?;

        let mut validation = validate_calculation_ranges(&data);
        let source_tier = source.map(|(_, tier)| tier);
        if source_tier.is_none() {
            validation.add_error(format!("No usable noise source for path {path_id}"));
        }
        if self.diagnostics.enabled {
            debug!(
                path = path_id,
                tier = ?source_tier,
                segments = data.segments.len(),
                "assembled path data"
            );
        }

        Ok(Assembly {
            ordered_segment_ids: ordered.iter().map(|s| s.id.clone()).collect(),
            data: source_tier.map(|_| data),
            source_tier,
            validation,
            degraded: false,
        })
    }

    /// First tier that yields a usable source wins: a spectrum or a level
    /// above 0 dBA. A dangling primary-source reference is an error (it sends
    /// the build to the fallback path).
    fn resolve_source(
        &self,
        project: &Project,
        path: &PathDef,
        ordered: &[&SegmentDef],
    ) -> AppResult<Option<(SourceSpec, SourceTier)>> {
        if let Some(id) = path.primary_source_id.as_deref() {
            let component = project
                .component(id)
                .ok_or_else(|| AppError::ComponentNotFound(id.to_string()))?;
            let octave_band_levels = match_unit(project, &component.name, component.kind)
                .and_then(|m| preferred_spectrum(m.unit))
                .map(|(_, bands)| bands);
            let noise_level = component_level(component);
            if octave_band_levels.is_some() || noise_level > 0.0 {
                debug!(
                    component = %component.name,
                    spectrum = octave_band_levels.is_some(),
                    "source from primary component"
                );
                return Ok(Some((
                    SourceSpec {
                        component_type: component.kind.as_str().to_string(),
                        noise_level,
                        octave_band_levels,
                    },
                    SourceTier::PrimaryComponent,
                )));
            }
            debug!(component = %component.name, "primary component is silent, trying next tier");
        }

        if let Some(unit_id) = path.mechanical_unit_id.as_deref() {
            match project.mechanical_unit(unit_id) {
                Some(unit) => {
                    let spectrum = preferred_spectrum(unit).map(|(_, bands)| bands);
                    let noise_level = match (&spectrum, unit.base_noise_dba) {
                        (Some(bands), _) => calculate_overall_dba(bands.levels()),
                        (None, Some(base)) => base,
                        (None, None) => self.defaults.unit_default_dba,
                    };
                    debug!(unit = %unit.name, noise_level, "source from mechanical unit");
                    return Ok(Some((
                        SourceSpec {
                            component_type: unit.unit_type.to_ascii_lowercase(),
                            noise_level,
                            octave_band_levels: spectrum,
                        },
                        SourceTier::MechanicalUnit,
                    )));
                }
                None => warn!(unit = unit_id, "linked mechanical unit not found"),
            }
        }

        let upstream = ordered
            .first()
            .and_then(|s| s.from_component_id.as_deref())
            .and_then(|id| project.component(id));
        if let Some(component) = upstream {
            let noise_level = component_level(component);
            if noise_level > 0.0 {
                debug!(component = %component.name, "source from upstream component");
                return Ok(Some((
                    SourceSpec {
                        component_type: component.kind.as_str().to_string(),
                        noise_level,
                        octave_band_levels: None,
                    },
                    SourceTier::UpstreamComponent,
                )));
            }
        }
        Ok(None)
    }

    fn resolve_terminal(
        &self,
        project: &Project,
        path: &PathDef,
        ordered: &[&SegmentDef],
    ) -> AppResult<Option<TerminalSpec>> {
        let component = match path.terminal_component_id.as_deref() {
            Some(id) => Some(
                project
                    .component(id)
                    .ok_or_else(|| AppError::ComponentNotFound(id.to_string()))?,
            ),
            None => ordered
                .last()
                .and_then(|s| s.to_component_id.as_deref())
                .and_then(|id| project.component(id)),
        };
        Ok(component.map(|c| TerminalSpec {
            component_type: c.kind.as_str().to_string(),
            noise_level: component_level(c),
            element_id: Some(c.id.clone()),
        }))
    }

    /// Engine spec of a stored segment.
    ///
    /// With neither flow nor velocity stored the default velocity is assumed
    /// and the flow follows from the cross-section. A stored flow without a
    /// velocity gives velocity = flow / area.
    pub fn segment_spec(&self, segment: &SegmentDef) -> SegmentSpec {
        let (duct_shape, duct_width, duct_height, diameter, area) = match segment.shape {
            DuctShapeDef::Rectangular {
                width_in,
                height_in,
            } => (
                DuctShape::Rectangular,
                Some(width_in),
                Some(height_in),
                None,
                rectangular_area(width_in, height_in),
            ),
            DuctShapeDef::Circular { diameter_in } => (
                DuctShape::Circular,
                None,
                None,
                Some(diameter_in),
                circular_area(diameter_in),
            ),
        };
        let area_sq_ft = as_sq_ft(area);

        let (flow_rate, flow_velocity) = match (segment.flow_rate_cfm, segment.velocity_fpm) {
            (Some(flow), Some(velocity)) => (flow, velocity),
            (Some(flow), None) if area_sq_ft > 0.0 => (flow, flow / area_sq_ft),
            (Some(flow), None) => (flow, self.defaults.default_velocity_fpm),
            (None, velocity) => {
                let velocity = velocity.unwrap_or(self.defaults.default_velocity_fpm);
                (as_cfm(flow_through(area, fpm(velocity))), velocity)
            }
        };

        let fittings: Vec<FittingSpec> = segment
            .fittings
            .iter()
            .map(|f| FittingSpec {
                fitting_type: f.fitting_type.clone(),
                noise_adjustment: f
                    .noise_adjustment_db
                    .unwrap_or_else(|| default_fitting_adjustment(&f.fitting_type)),
                position: f.position_ft,
            })
            .collect();

        SegmentSpec {
            element_id: segment.id.clone(),
            length: segment.length_ft,
            duct_width,
            duct_height,
            diameter,
            duct_shape,
            duct_type: segment.duct_type.as_str().to_string(),
            insulation: segment.insulation.clone(),
            lining_thickness: segment.lining_thickness_in,
            flow_rate,
            flow_velocity,
            fitting_class: FittingClass::infer(segment.fittings.iter().map(|f| f.fitting_type.as_str())),
            fittings,
        }
    }

    /// Degraded build from whatever records resolve, with every unreadable
    /// value replaced by a configured default.
    fn build_fallback(&self, project: &Project, path_id: &str, cause: &AppError) -> Assembly {
        let mut validation = ValidationResult::new();
        validation.add_warning(format!(
            "Path data assembled from fallback defaults ({cause})"
        ));

        let Some(path) = project.path(path_id) else {
            validation.add_error(format!("Path {path_id} not found"));
            return Assembly {
                data: None,
                source_tier: None,
                ordered_segment_ids: Vec::new(),
                validation,
                degraded: true,
            };
        };

        let resolvable: Vec<&SegmentDef> = path
            .segment_ids
            .iter()
            .filter_map(|id| project.segment(id))
            .collect();
        let ordered: Vec<&SegmentDef> = dn_graph::order(&resolvable, None)
            .into_iter()
            .copied()
            .collect();

        let mut segments: Vec<SegmentSpec> =
            ordered.iter().map(|s| self.fallback_segment(s)).collect();
        if segments.is_empty() {
            segments.push(self.fallback_segment(&SegmentDef::rectangular(
                &format!("{path_id}-fallback"),
                None,
                None,
                self.defaults.fallback_length_ft,
                self.defaults.fallback_width_in,
                self.defaults.fallback_height_in,
            )));
        }

        let source_component = path
            .primary_source_id
            .as_deref()
            .and_then(|id| project.component(id))
            .or_else(|| {
                ordered
                    .first()
                    .and_then(|s| s.from_component_id.as_deref())
                    .and_then(|id| project.component(id))
            });
        let source = SourceSpec {
            component_type: source_component
                .map_or("unknown", |c| c.kind.as_str())
                .to_string(),
            noise_level: source_component
                .and_then(|c| c.noise_level_dba)
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(self.defaults.fallback_source_dba),
            octave_band_levels: None,
        };

        let terminal_component = path
            .terminal_component_id
            .as_deref()
            .and_then(|id| project.component(id));
        let terminal = TerminalSpec {
            component_type: terminal_component
                .map_or("terminal", |c| c.kind.as_str())
                .to_string(),
            noise_level: terminal_component
                .and_then(|c| c.noise_level_dba)
                .filter(|v| v.is_finite())
                .unwrap_or(self.defaults.fallback_terminal_dba),
            element_id: terminal_component.map(|c| c.id.clone()),
        };

        let data = PathData {
            source_component: Some(source),
            segments,
            terminal_component: Some(terminal),
        };
        validation.merge(validate_calculation_ranges(&data));

        Assembly {
            ordered_segment_ids: data.segments.iter().map(|s| s.element_id.clone()).collect(),
            data: Some(data),
            source_tier: Some(SourceTier::Fallback),
            validation,
            degraded: true,
        }
    }

    fn fallback_segment(&self, segment: &SegmentDef) -> SegmentSpec {
        let d = &self.defaults;
        let usable = |v: f64| v.is_finite() && v > 0.0;

        let mut sanitized = segment.clone();
        if !usable(sanitized.length_ft) {
            sanitized.length_ft = d.fallback_length_ft;
        }
        let shape_ok = match sanitized.shape {
            DuctShapeDef::Rectangular {
                width_in,
                height_in,
            } => usable(width_in) && usable(height_in),
            DuctShapeDef::Circular { diameter_in } => usable(diameter_in),
        };
        if !shape_ok {
            sanitized.shape = DuctShapeDef::Rectangular {
                width_in: d.fallback_width_in,
                height_in: d.fallback_height_in,
            };
        }
        if !sanitized.lining_thickness_in.is_finite() || sanitized.lining_thickness_in < 0.0 {
            sanitized.lining_thickness_in = 0.0;
        }
        sanitized.flow_rate_cfm = sanitized.flow_rate_cfm.filter(|v| usable(*v));
        sanitized.velocity_fpm = sanitized.velocity_fpm.filter(|v| usable(*v));
        sanitized.fittings.retain(|f| {
            f.position_ft.is_finite() && f.noise_adjustment_db.is_none_or(f64::is_finite)
        });
        self.segment_spec(&sanitized)
    }
}

/// Stored level of a component, or the catalog default for its type.
fn component_level(component: &ComponentDef) -> f64 {
    component
        .noise_level_dba
        .unwrap_or_else(|| default_noise_level(component.kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dn_project::{ComponentType, FittingDef, MechanicalUnitDef, PositionDef};

    fn component(id: &str, name: &str, kind: ComponentType, level: Option<f64>) -> ComponentDef {
        ComponentDef {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            position: PositionDef { x: 0.0, y: 0.0 },
            noise_level_dba: level,
            flow_rate_cfm: None,
        }
    }

    const OUTLET: &str = r#"{"63":82,"125":78,"250":74,"500":70,"1000":66,"2000":61,"4000":56,"8000":50}"#;

    fn project() -> Project {
        let mut p = Project::new("assembly");
        p.components = vec![
            component("fan", "EF-2", ComponentType::Fan, Some(68.0)),
            component("j", "J-1", ComponentType::Junction, None),
            component("d", "D-1", ComponentType::Diffuser, None),
        ];
        let mut s1 = SegmentDef::rectangular("s1", Some("fan"), Some("j"), 30.0, 24.0, 12.0);
        s1.order = 2;
        s1.flow_rate_cfm = Some(1200.0);
        let mut s2 = SegmentDef::rectangular("s2", Some("j"), Some("d"), 15.0, 12.0, 12.0);
        s2.order = 1;
        s2.fittings.push(FittingDef {
            fitting_type: "Elbow 90".to_string(),
            position_ft: 4.0,
            noise_adjustment_db: None,
        });
        p.segments = vec![s2, s1];
        p.paths.push(PathDef::new("p1", "Exhaust", &["s2", "s1"]));
        p
    }

    fn assembler() -> PathDataAssembler {
        PathDataAssembler::new(&AnalysisConfig::default())
    }

    #[test]
    fn upstream_component_tier_and_order() {
        let p = project();
        let assembly = assembler().build(&p, "p1");
        assert!(!assembly.degraded);
        assert_eq!(assembly.source_tier, Some(SourceTier::UpstreamComponent));
        assert_eq!(assembly.ordered_segment_ids, vec!["s1", "s2"]);

        let data = assembly.data.unwrap();
        assert_eq!(data.source_component.unwrap().noise_level, 68.0);
        assert_eq!(data.terminal_component.unwrap().element_id.as_deref(), Some("d"));
    }

    #[test]
    fn segment_defaults() {
        let p = project();
        let data = assembler().build(&p, "p1").data.unwrap();

        let main = &data.segments[0];
        assert!((main.flow_velocity - 600.0).abs() < 1e-6);

        let branch = &data.segments[1];
        assert_eq!(branch.flow_velocity, 800.0);
        assert!((branch.flow_rate - 800.0).abs() < 1e-6);
        assert_eq!(branch.fittings[0].noise_adjustment, 3.0);
        assert_eq!(branch.fitting_class, Some(FittingClass::Elbow));
    }

    #[test]
    fn primary_component_enriched_from_matching_unit() {
        let mut p = project();
        let mut unit = MechanicalUnitDef::new("mu", "EF-2", "EF");
        unit.outlet_spectrum_json = Some(OUTLET.to_string());
        p.mechanical_units.push(unit);
        p.path_mut("p1").unwrap().primary_source_id = Some("fan".to_string());

        let assembly = assembler().build(&p, "p1");
        assert_eq!(assembly.source_tier, Some(SourceTier::PrimaryComponent));
        let source = assembly.data.unwrap().source_component.unwrap();
        assert_eq!(source.noise_level, 68.0);
        assert_eq!(source.octave_band_levels.unwrap().band(0), Some(82.0));
    }

    #[test]
    fn mechanical_unit_tier() {
        let mut p = project();
        p.segments[1].from_component_id = None;
        let mut unit = MechanicalUnitDef::new("mu", "AHU-5", "AHU");
        unit.base_noise_dba = Some(71.0);
        p.mechanical_units.push(unit);
        p.path_mut("p1").unwrap().mechanical_unit_id = Some("mu".to_string());

        let assembly = assembler().build(&p, "p1");
        assert_eq!(assembly.source_tier, Some(SourceTier::MechanicalUnit));
        let source = assembly.data.unwrap().source_component.unwrap();
        assert_eq!(source.noise_level, 71.0);
        assert!(source.octave_band_levels.is_none());

        p.mechanical_units[0].inlet_spectrum_json = Some(OUTLET.to_string());
        let source = assembler()
            .build(&p, "p1")
            .data
            .unwrap()
            .source_component
            .unwrap();
        let expected = calculate_overall_dba(&[82.0, 78.0, 74.0, 70.0, 66.0, 61.0, 56.0, 50.0]);
        assert!((source.noise_level - expected).abs() < 1e-9);
    }

    #[test]
    fn silent_primary_component_defers_to_linked_unit() {
        let mut p = project();
        let mut unit = MechanicalUnitDef::new("mu", "AHU-5", "AHU");
        unit.base_noise_dba = Some(72.0);
        p.mechanical_units.push(unit);
        let path = p.path_mut("p1").unwrap();
        path.primary_source_id = Some("j".to_string());
        path.mechanical_unit_id = Some("mu".to_string());

        let assembly = assembler().build(&p, "p1");
        assert_eq!(assembly.source_tier, Some(SourceTier::MechanicalUnit));
        let source = assembly.data.unwrap().source_component.unwrap();
        assert_eq!(source.noise_level, 72.0);
        assert_eq!(source.component_type, "ahu");

        // ordering starts at the junction, so no tier is left
        p.path_mut("p1").unwrap().mechanical_unit_id = None;
        let assembly = assembler().build(&p, "p1");
        assert_eq!(assembly.source_tier, None);
        assert!(assembly.data.is_none());
    }

    #[test]
    fn no_source_means_no_data() {
        let mut p = project();
        p.segments[1].from_component_id = None;
        let assembly = assembler().build(&p, "p1");
        assert!(assembly.data.is_none());
        assert!(!assembly.validation.is_valid());
        assert!(!assembly.degraded);
    }

    #[test]
    fn dangling_segment_falls_back() {
        let mut p = project();
        p.path_mut("p1").unwrap().segment_ids.push("s-gone".to_string());
        let assembly = assembler().build(&p, "p1");
        assert!(assembly.degraded);
        assert_eq!(assembly.source_tier, Some(SourceTier::Fallback));
        assert!(assembly.validation.warnings()[0].contains("fallback"));
        let data = assembly.data.unwrap();
        assert_eq!(data.segments.len(), 2);
        assert_eq!(data.source_component.unwrap().noise_level, 68.0);
        assert_eq!(data.terminal_component.unwrap().noise_level, 50.0);
    }

    #[test]
    fn non_finite_values_are_replaced() {
        let mut p = project();
        p.segments[0].shape = DuctShapeDef::Rectangular {
            width_in: f64::NAN,
            height_in: 12.0,
        };
        p.segments[0].length_ft = f64::INFINITY;
        let assembly = assembler().build(&p, "p1");
        assert!(assembly.degraded);
        let data = assembly.data.unwrap();
        let s2 = data.segments.iter().find(|s| s.element_id == "s2").unwrap();
        assert_eq!(s2.duct_width, Some(12.0));
        assert_eq!(s2.duct_height, Some(8.0));
        assert_eq!(s2.length, 10.0);
    }

    #[test]
    fn missing_path_has_no_data() {
        let p = project();
        let assembly = assembler().build(&p, "p-none");
        assert!(assembly.data.is_none());
        assert!(assembly.degraded);
        assert!(!assembly.validation.is_valid());
    }
}

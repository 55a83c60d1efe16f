//! Edits that trigger recalculation.
//!
//! Every mutation recalculates each path it touches, synchronously, before
//! returning.

use dn_core::ensure_finite;
use dn_engine::PropagationEngine;
use dn_project::{DuctShapeDef, DuctType, FittingDef, PathDef, Project};
use dn_results::ResultStore;
use tracing::debug;

use crate::analysis_service::{AnalysisOptions, PathAnalysis, analyze_path};
use crate::config::AnalysisConfig;
use crate::error::{AppError, AppResult};

/// Property changes to one segment. `None` leaves a property as is.
#[derive(Debug, Clone, Default)]
pub struct SegmentEdit {
    pub length_ft: Option<f64>,
    pub shape: Option<DuctShapeDef>,
    pub duct_type: Option<DuctType>,
    pub insulation: Option<String>,
    pub lining_thickness_in: Option<f64>,
    pub flow_rate_cfm: Option<f64>,
    pub velocity_fpm: Option<f64>,
}

impl SegmentEdit {
    fn check(&self) -> AppResult<()> {
        let mut numbers = vec![
            self.length_ft,
            self.lining_thickness_in,
            self.flow_rate_cfm,
            self.velocity_fpm,
        ];
        match self.shape {
            Some(DuctShapeDef::Rectangular {
                width_in,
                height_in,
            }) => numbers.extend([Some(width_in), Some(height_in)]),
            Some(DuctShapeDef::Circular { diameter_in }) => numbers.push(Some(diameter_in)),
            None => {}
        }
        for value in numbers.into_iter().flatten() {
            ensure_finite(value, "segment edit").map_err(|e| AppError::InvalidInput(e.to_string()))?;
        }
        Ok(())
    }
}

/// Recalculates paths after edits with a fixed engine, configuration and
/// (optional) result store.
pub struct Recalculator<'a> {
    engine: &'a dyn PropagationEngine,
    config: &'a AnalysisConfig,
    store: Option<&'a ResultStore>,
    options: AnalysisOptions,
}

impl<'a> Recalculator<'a> {
    pub fn new(
        engine: &'a dyn PropagationEngine,
        config: &'a AnalysisConfig,
        store: Option<&'a ResultStore>,
    ) -> Self {
        Self {
            engine,
            config,
            store,
            options: AnalysisOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn recalculate(&self, project: &mut Project, path_ids: &[String]) -> AppResult<Vec<PathAnalysis>> {
        path_ids
            .iter()
            .map(|id| {
                analyze_path(
                    project,
                    id,
                    self.engine,
                    self.config,
                    self.store,
                    &self.options,
                )
            })
            .collect()
    }

    /// Apply property changes to a segment and recalculate every path that
    /// runs through it.
    pub fn update_segment(
        &self,
        project: &mut Project,
        segment_id: &str,
        edit: &SegmentEdit,
    ) -> AppResult<Vec<PathAnalysis>> {
        edit.check()?;
        let segment = project
            .segment_mut(segment_id)
            .ok_or_else(|| AppError::SegmentNotFound(segment_id.to_string()))?;

        if let Some(v) = edit.length_ft {
            segment.length_ft = v;
        }
        if let Some(shape) = edit.shape {
            segment.shape = shape;
        }
        if let Some(duct_type) = edit.duct_type {
            segment.duct_type = duct_type;
        }
        if let Some(insulation) = &edit.insulation {
            segment.insulation = Some(insulation.clone());
        }
        if let Some(v) = edit.lining_thickness_in {
            segment.lining_thickness_in = v;
        }
        if let Some(v) = edit.flow_rate_cfm {
            segment.flow_rate_cfm = Some(v);
        }
        if let Some(v) = edit.velocity_fpm {
            segment.velocity_fpm = Some(v);
        }

        let affected = project.paths_through_segment(segment_id);
        debug!(segment = segment_id, paths = affected.len(), "segment edited");
        self.recalculate(project, &affected)
    }

    /// Attach a fitting to a segment and recalculate the paths through it.
    pub fn add_fitting(
        &self,
        project: &mut Project,
        segment_id: &str,
        fitting: FittingDef,
    ) -> AppResult<Vec<PathAnalysis>> {
        if !fitting.position_ft.is_finite()
            || fitting.noise_adjustment_db.is_some_and(|v| !v.is_finite())
        {
            return Err(AppError::InvalidInput(format!(
                "fitting {} has a non-finite value",
                fitting.fitting_type
            )));
        }
        let segment = project
            .segment_mut(segment_id)
            .ok_or_else(|| AppError::SegmentNotFound(segment_id.to_string()))?;
        segment.fittings.push(fitting);

        let affected = project.paths_through_segment(segment_id);
        self.recalculate(project, &affected)
    }

    /// Create a path over existing segments and calculate it.
    pub fn create_path(
        &self,
        project: &mut Project,
        name: &str,
        segment_ids: &[&str],
        primary_source_id: Option<&str>,
    ) -> AppResult<(String, PathAnalysis)> {
        if let Some(missing) = segment_ids.iter().find(|id| project.segment(id).is_none()) {
            return Err(AppError::SegmentNotFound(missing.to_string()));
        }
        if let Some(id) = primary_source_id
            && project.component(id).is_none()
        {
            return Err(AppError::ComponentNotFound(id.to_string()));
        }

        let path_id = uuid::Uuid::new_v4().to_string();
        let mut path = PathDef::new(&path_id, name, segment_ids);
        path.primary_source_id = primary_source_id.map(str::to_string);
        project.paths.push(path);

        let analysis = analyze_path(
            project,
            &path_id,
            self.engine,
            self.config,
            self.store,
            &self.options,
        )?;
        Ok((path_id, analysis))
    }
}

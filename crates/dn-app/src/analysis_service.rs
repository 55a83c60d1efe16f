//! Path analysis: assemble, validate, propagate, rate, persist.

use dn_acoustics::{
    NcAnalysis, SpaceType, SpectrumShape, StandardsComparison, analyze_octave_band_data,
    compare_to_standards, estimate_octave_bands_from_dba,
};
use dn_core::ValidationResult;
use dn_engine::PropagationEngine;
use dn_project::{CachedResultDef, Project};
use dn_results::{AnalysisRecord, PathAnalysisResult, ResultStore, compute_analysis_id};
use dn_validate::{validate_calculation_inputs, validate_path};
use tracing::{debug, info, warn};

use crate::assembler::{PathDataAssembler, SourceTier};
use crate::config::AnalysisConfig;
use crate::error::{AppError, AppResult};

/// Options for running analyses.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Reuse a stored analysis with the same id instead of calling the engine.
    pub use_cache: bool,
    /// Persist new analyses when a store is given.
    pub store_results: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            store_results: true,
        }
    }
}

/// Everything one analysis produced.
#[derive(Debug, Clone)]
pub struct PathAnalysis {
    pub result: PathAnalysisResult,
    pub analysis_id: Option<String>,
    pub validation: ValidationResult,
    pub source_tier: Option<SourceTier>,
    pub nc: Option<NcAnalysis>,
    pub comparison: Option<StandardsComparison>,
    pub degraded: bool,
    pub loaded_from_cache: bool,
}

/// Analyse one path and cache the outcome on it.
///
/// Only an unknown path id is an `Err`. Every other failure (no usable
/// source, invalid inputs, an engine fault) yields a result with
/// `calculation_valid = false` and the reason attached.
pub fn analyze_path(
    project: &mut Project,
    path_id: &str,
    engine: &dyn PropagationEngine,
    config: &AnalysisConfig,
    store: Option<&ResultStore>,
    options: &AnalysisOptions,
) -> AppResult<PathAnalysis> {
    let path = project
        .path(path_id)
        .ok_or_else(|| AppError::PathNotFound(path_id.to_string()))?;
    let path_name = path.name.clone();
    let space_type = path
        .target_space_id
        .as_deref()
        .and_then(|id| project.space(id))
        .map_or_else(
            || SpaceType::lookup(&config.default_space_type),
            |space| SpaceType::lookup(&space.space_type),
        );

    let mut validation = validate_path(project, path_id);
    let assembly = PathDataAssembler::new(config).build(project, path_id);
    validation.merge(assembly.validation);

    let Some(data) = assembly.data else {
        warn!(path = path_id, "no usable noise source");
        let mut result =
            PathAnalysisResult::failed(path_id, &path_name, "No usable noise source for this path");
        result.warnings = collect_messages(&validation);
        cache_on_path(project, path_id, &result);
        return Ok(PathAnalysis {
            result,
            analysis_id: None,
            validation,
            source_tier: None,
            nc: None,
            comparison: None,
            degraded: assembly.degraded,
            loaded_from_cache: false,
        });
    };
    validation.merge(validate_calculation_inputs(&data));

    let engine_version = format!("{}/{}", engine.name(), config.engine_version);
    let analysis_id = compute_analysis_id(path_id, &data, &engine_version);

    let cached = match store {
        Some(store) if options.use_cache && store.has_analysis(&analysis_id) => {
            match store.load(&analysis_id) {
                Ok(record) => Some(record.result),
                Err(err) => {
                    warn!(analysis = %analysis_id, error = %err, "ignoring unreadable stored analysis");
                    None
                }
            }
        }
        _ => None,
    };
    let loaded_from_cache = cached.is_some();

    let mut result = match cached {
        Some(result) => {
            debug!(path = path_id, analysis = %analysis_id, "loaded cached analysis");
            result
        }
        None => {
            let mut result = match engine.calculate(&data) {
                Ok(output) => PathAnalysisResult::from_engine(path_id, &path_name, &output),
                Err(err) => {
                    warn!(path = path_id, error = %err, "propagation engine failed");
                    PathAnalysisResult::failed(
                        path_id,
                        &path_name,
                        format!("Propagation engine failed: {err}"),
                    )
                }
            };
            if !validation.is_valid() {
                result.calculation_valid = false;
                if result.error_message.is_none() {
                    result.error_message = validation.errors().first().cloned();
                }
            }
            result.warnings.extend(collect_messages(&validation));
            result
        }
    };

    let rating = rate_result(&result, space_type);
    // stored records already carry their rating
    if !loaded_from_cache && let Some(rating) = &rating {
        apply_rating(&mut result, rating);
    }
    let (nc, comparison) = match rating {
        Some(rating) => (Some(rating.nc), Some(rating.comparison)),
        None => (None, None),
    };

    if let Some(store) = store
        && options.store_results
        && !loaded_from_cache
    {
        let record = AnalysisRecord::new(analysis_id.clone(), &engine_version, result.clone());
        store.save(&record)?;
    }
    cache_on_path(project, path_id, &result);

    info!(
        path = path_id,
        terminal_dba = result.terminal_noise,
        nc = result.nc_rating,
        valid = result.calculation_valid,
        "path analysed"
    );

    Ok(PathAnalysis {
        result,
        analysis_id: Some(analysis_id),
        validation,
        source_tier: assembly.source_tier,
        nc,
        comparison,
        degraded: assembly.degraded,
        loaded_from_cache,
    })
}

/// Analyse every path of the project, in stored order.
pub fn analyze_all(
    project: &mut Project,
    engine: &dyn PropagationEngine,
    config: &AnalysisConfig,
    store: Option<&ResultStore>,
    options: &AnalysisOptions,
) -> AppResult<Vec<PathAnalysis>> {
    let ids: Vec<String> = project.paths.iter().map(|p| p.id.clone()).collect();
    ids.iter()
        .map(|id| analyze_path(project, id, engine, config, store, options))
        .collect()
}

/// NC rating of an engine result against its space.
struct Rating {
    nc: NcAnalysis,
    comparison: StandardsComparison,
    /// Rated from a spectrum estimated off the terminal dBA.
    estimated: bool,
}

/// NC post-processing of an engine result.
///
/// A terminal spectrum from the engine is re-rated here. Without one, a
/// spectrum is estimated from the terminal dBA for the space comparison only.
fn rate_result(result: &PathAnalysisResult, space_type: SpaceType) -> Option<Rating> {
    if !result.calculation_valid && result.terminal_noise <= 0.0 {
        return None;
    }
    let target = space_type.criteria().recommended_nc;

    let (spectrum, estimated) = match result.octave_band_spectrum {
        Some(spectrum) => (spectrum, false),
        None if result.terminal_noise > 0.0 => (
            estimate_octave_bands_from_dba(result.terminal_noise, SpectrumShape::DiffuserNoise),
            true,
        ),
        None => return None,
    };
    let nc = analyze_octave_band_data(&spectrum, Some(target)).ok()?;
    let comparison = compare_to_standards(&nc, space_type);
    Some(Rating {
        nc,
        comparison,
        estimated,
    })
}

/// Fold a rating into a freshly calculated result: a re-rated spectrum
/// replaces the engine's NC and contributes its warnings.
fn apply_rating(result: &mut PathAnalysisResult, rating: &Rating) {
    if rating.estimated {
        result
            .warnings
            .push("Terminal spectrum estimated from overall dBA for NC comparison".to_string());
    } else {
        result.nc_rating = rating.nc.nc_rating;
        result.warnings.extend(rating.nc.warnings.iter().cloned());
    }
}

fn collect_messages(validation: &ValidationResult) -> Vec<String> {
    validation
        .errors()
        .iter()
        .chain(validation.warnings())
        .cloned()
        .collect()
}

fn cache_on_path(project: &mut Project, path_id: &str, result: &PathAnalysisResult) {
    if let Some(path) = project.path_mut(path_id) {
        path.last_result = Some(CachedResultDef {
            terminal_noise_dba: result.terminal_noise,
            nc_rating: result.nc_rating,
            calculation_valid: result.calculation_valid,
            calculated_at: chrono::Utc::now().to_rfc3339(),
        });
    }
}

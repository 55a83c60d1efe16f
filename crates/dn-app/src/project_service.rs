//! Project loading, saving, validation, and introspection.

use std::path::Path;

use dn_project::{PathDef, Project};

use crate::error::{AppError, AppResult};

/// Summary of a path for listing.
#[derive(Debug, Clone)]
pub struct PathSummary {
    pub id: String,
    pub name: String,
    pub segment_count: usize,
    pub primary_source_id: Option<String>,
    pub last_nc: Option<u8>,
    pub last_terminal_dba: Option<f64>,
}

/// Load a project (YAML or JSON), migrating and validating it.
pub fn load_project(path: &Path) -> AppResult<Project> {
    Ok(dn_project::load(path)?)
}

/// Save a project (YAML or JSON by extension).
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    Ok(dn_project::save(path, project)?)
}

/// Structural validation of the whole snapshot.
pub fn validate_project(project: &Project) -> AppResult<()> {
    dn_project::validate_project(project).map_err(|e| AppError::Validation(e.to_string()))
}

pub fn list_paths(project: &Project) -> Vec<PathSummary> {
    project
        .paths
        .iter()
        .map(|path| PathSummary {
            id: path.id.clone(),
            name: path.name.clone(),
            segment_count: path.segment_ids.len(),
            primary_source_id: path.primary_source_id.clone(),
            last_nc: path.last_result.as_ref().map(|r| r.nc_rating),
            last_terminal_dba: path.last_result.as_ref().map(|r| r.terminal_noise_dba),
        })
        .collect()
}

pub fn get_path<'a>(project: &'a Project, path_id: &str) -> AppResult<&'a PathDef> {
    project
        .path(path_id)
        .ok_or_else(|| AppError::PathNotFound(path_id.to_string()))
}

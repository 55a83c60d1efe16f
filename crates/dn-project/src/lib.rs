//! dn-project: canonical project snapshot format and validation.
//!
//! A `Project` is a plain, owned snapshot of everything a calculation needs:
//! drawn components, duct segments with their fittings, paths, imported
//! mechanical units and spaces. Nothing in it refers back to a live store.

pub mod ingress;
pub mod migrate;
pub mod schema;
pub mod validate;

pub use ingress::{DrawingPayload, DrawnComponent, DrawnSegment, EndpointRef, IngressReport, materialize};
pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_project};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Unsupported project file extension: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let mut project: Project = serde_yaml::from_str(&content)?;
    project = migrate_to_latest(project)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let mut project: Project = serde_json::from_str(&content)?;
    project = migrate_to_latest(project)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a project, picking the format from the file extension.
pub fn load(path: &std::path::Path) -> ProjectResult<Project> {
    match extension_of(path).as_str() {
        "yaml" | "yml" => load_yaml(path),
        "json" => load_json(path),
        other => Err(ProjectError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

/// Save a project, picking the format from the file extension.
pub fn save(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    match extension_of(path).as_str() {
        "yaml" | "yml" => save_yaml(path, project),
        "json" => save_json(path, project),
        other => Err(ProjectError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

fn extension_of(path: &std::path::Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

//! Shared application service layer for ductnoise.
//!
//! This crate provides the interface the CLI (and any other front end) drives:
//! configuration, project loading, path data assembly with fallback source
//! resolution, path analysis with result persistence, and edits that
//! recalculate the affected paths.

pub mod analysis_service;
pub mod assembler;
pub mod config;
pub mod edit_service;
pub mod error;
pub mod project_service;

// Re-export key types for convenience
pub use analysis_service::{AnalysisOptions, PathAnalysis, analyze_all, analyze_path};
pub use assembler::{Assembly, PathDataAssembler, SourceTier};
pub use config::{AnalysisConfig, AssemblyDefaults, DiagnosticsContext, load_config};
pub use edit_service::{Recalculator, SegmentEdit};
pub use error::{AppError, AppResult};
pub use project_service::{
    PathSummary, get_path, list_paths, load_project, save_project, validate_project,
};

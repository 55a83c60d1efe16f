//! Analysis configuration.
//!
//! Everything is optional in the YAML file; missing fields take the defaults
//! below.
//!
//! ```yaml
//! diagnostics:
//!   enabled: true
//!   level: debug
//! assembly:
//!   default_velocity_fpm: 800
//! default_space_type: private_office
//! engine_version: "2026.1"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{AppError, AppResult};

/// Diagnostic output settings handed to every service instead of a global
/// logger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsContext {
    pub enabled: bool,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
}

impl Default for DiagnosticsContext {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl DiagnosticsContext {
    /// Most verbose level to emit. Disabled diagnostics still let warnings
    /// through; an unknown level name reads as `info`.
    pub fn max_level(&self) -> Level {
        if !self.enabled {
            return Level::WARN;
        }
        self.level.parse().unwrap_or(Level::INFO)
    }
}

/// Values the assembler falls back on when records are incomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyDefaults {
    pub default_velocity_fpm: f64,
    pub fallback_width_in: f64,
    pub fallback_height_in: f64,
    pub fallback_length_ft: f64,
    pub fallback_source_dba: f64,
    pub fallback_terminal_dba: f64,
    pub unit_default_dba: f64,
}

impl Default for AssemblyDefaults {
    fn default() -> Self {
        Self {
            default_velocity_fpm: 800.0,
            fallback_width_in: 12.0,
            fallback_height_in: 8.0,
            fallback_length_ft: 10.0,
            fallback_source_dba: 50.0,
            fallback_terminal_dba: 50.0,
            unit_default_dba: dn_catalog::DEFAULT_UNIT_DBA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub diagnostics: DiagnosticsContext,
    pub assembly: AssemblyDefaults,
    /// Space type used when a path has no target space.
    pub default_space_type: String,
    /// Overrides `<project dir>/.ductnoise/analyses`.
    pub results_dir: Option<PathBuf>,
    /// Recorded with every stored analysis and part of its id.
    pub engine_version: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            diagnostics: DiagnosticsContext::default(),
            assembly: AssemblyDefaults::default(),
            default_space_type: "open_office".to_string(),
            results_dir: None,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

/// Load configuration from a YAML file.
pub fn load_config(path: &Path) -> AppResult<AnalysisConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    AnalysisConfig::from_yaml_str(&content).map_err(|e| AppError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

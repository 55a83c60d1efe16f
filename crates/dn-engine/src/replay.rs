//! Engine that serves recorded outputs.
//!
//! Used to drive the pipeline from results computed elsewhere (an external
//! propagation tool, a previous session) and as a deterministic engine in
//! tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::contract::{EngineOutput, PathData};
use crate::error::{EngineError, EngineResult};
use crate::traits::PropagationEngine;

/// Recorded outputs, either one for every path or keyed by the id of the
/// path's first segment.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Recording {
    Single(EngineOutput),
    ByFirstSegment(BTreeMap<String, EngineOutput>),
}

#[derive(Debug, Clone)]
pub struct ReplayEngine {
    name: String,
    recording: Recording,
}

impl ReplayEngine {
    /// Replay the same output for every path.
    pub fn new(output: EngineOutput) -> Self {
        Self {
            name: "replay".to_string(),
            recording: Recording::Single(output),
        }
    }

    /// Replay outputs keyed by first segment id.
    pub fn keyed(outputs: BTreeMap<String, EngineOutput>) -> Self {
        Self {
            name: "replay".to_string(),
            recording: Recording::ByFirstSegment(outputs),
        }
    }

    /// Load a recording: a single `EngineOutput` object, or an object mapping
    /// first-segment ids to outputs.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let content = fs::read_to_string(path)?;
        let recording: Recording = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "loaded engine recording");
        Ok(Self {
            name: format!("replay:{}", path.display()),
            recording,
        })
    }
}

impl PropagationEngine for ReplayEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(&self, data: &PathData) -> EngineResult<EngineOutput> {
        data.check()?;
        let mut output = match &self.recording {
            Recording::Single(output) => output.clone(),
            Recording::ByFirstSegment(outputs) => {
                let key = data
                    .segments
                    .first()
                    .map(|s| s.element_id.as_str())
                    .ok_or_else(|| EngineError::Failed {
                        message: "path has no segments to look up".to_string(),
                    })?;
                outputs.get(key).cloned().ok_or_else(|| EngineError::Failed {
                    message: format!("no recorded output for path starting at segment {key}"),
                })?
            }
        };

        let recorded_ducts = output
            .path_segments
            .iter()
            .filter(|e| e.element_type == "duct")
            .count();
        if recorded_ducts != 0 && recorded_ducts != data.segments.len() {
            warn!(
                recorded = recorded_ducts,
                assembled = data.segments.len(),
                "recording does not match the assembled path"
            );
            output.warnings.push(format!(
                "Recorded output has {recorded_ducts} duct elements but the path has {} segments",
                data.segments.len()
            ));
        }
        Ok(output)
    }
}

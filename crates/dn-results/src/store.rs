//! Analysis storage API.

use crate::types::AnalysisRecord;
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct ResultStore {
    root_dir: PathBuf,
}

impl ResultStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store kept next to a project file, under `.ductnoise/analyses`.
    pub fn for_project(project_path: &Path) -> ResultsResult<Self> {
        let project_dir = project_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "project path has no parent directory".to_string(),
            })?;
        Self::new(project_dir.join(".ductnoise").join("analyses"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn record_path(&self, analysis_id: &str) -> PathBuf {
        self.root_dir.join(format!("{analysis_id}.json"))
    }

    pub fn has_analysis(&self, analysis_id: &str) -> bool {
        self.record_path(analysis_id).exists()
    }

    pub fn save(&self, record: &AnalysisRecord) -> ResultsResult<()> {
        fs::create_dir_all(&self.root_dir)?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(&record.analysis_id), json)?;
        Ok(())
    }

    pub fn load(&self, analysis_id: &str) -> ResultsResult<AnalysisRecord> {
        let path = self.record_path(analysis_id);
        if !path.exists() {
            return Err(ResultsError::AnalysisNotFound {
                analysis_id: analysis_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Every stored analysis of a path, oldest first.
    pub fn list_for_path(&self, path_id: &str) -> ResultsResult<Vec<AnalysisRecord>> {
        let mut records = Vec::new();

        if !self.root_dir.exists() {
            return Ok(records);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(record) = self.load(id)
                && record.path_id == path_id
            {
                records.push(record);
            }
        }

        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(records)
    }

    pub fn latest_for_path(&self, path_id: &str) -> ResultsResult<Option<AnalysisRecord>> {
        Ok(self.list_for_path(path_id)?.pop())
    }

    pub fn delete(&self, analysis_id: &str) -> ResultsResult<()> {
        let path = self.record_path(analysis_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

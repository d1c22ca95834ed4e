//! Machine-readable run summaries written next to the CSV outputs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport<T: Serialize> {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub inputs: Vec<PathBuf>,
    pub summary: T,
}

impl<T: Serialize> RunReport<T> {
    pub fn new(tool: &str, inputs: &[&Path], summary: T) -> Self {
        Self {
            tool: tool.to_string(),
            generated_at: Utc::now(),
            inputs: inputs.iter().map(|p| p.to_path_buf()).collect(),
            summary,
        }
    }

    /// Pretty JSON, creating the parent directory if needed
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

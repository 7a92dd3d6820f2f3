//! VariableHistory: a map keyed by absolute agent-file path, to a map of
//! variable-name → string value, used to default interactive prompts.
//! Writes preserve unrelated keys (other agent paths, other variables for
//! the same path that this run didn't touch).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::paths;

#[derive(Debug, Default)]
pub struct VariableHistory {
    path: PathBuf,
    data: HashMap<String, HashMap<String, String>>,
}

impl VariableHistory {
    pub fn load() -> Result<Self> {
        Self::load_from(paths::history_path()?)
    }

    pub fn load_from(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            HashMap::new()
        };
        Ok(Self { path, data })
    }

    /// Previously recorded values for `agent_path`, or an empty map.
    pub fn for_agent(&self, agent_path: &Path) -> HashMap<String, String> {
        self.data
            .get(&agent_path.display().to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Merges `values` into the record for `agent_path` (new values win,
    /// untouched variables and other agent paths are preserved), then
    /// rewrites the file atomically.
    pub fn record(&mut self, agent_path: &Path, values: &HashMap<String, String>) -> Result<()> {
        let key = agent_path.display().to_string();
        let entry = self.data.entry(key).or_default();
        for (k, v) in values {
            entry.insert(k.clone(), v.clone());
        }
        let content = serde_json::to_string_pretty(&self.data)?;
        paths::write_atomic(&self.path, &content)
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Operator-supplied publish configuration, persisted across sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Access token for the content API; publish is unavailable until set
    pub token: Option<String>,

    /// Target repository in "owner/name" form
    pub repo: String,

    /// Path of the published file inside the repository
    pub file_path: String,

    /// Branch the conditional write targets
    pub branch: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: None,
            repo: String::new(),
            file_path: "data/nodes.json".to_string(),
            branch: "main".to_string(),
        }
    }
}

impl Settings {
    /// Whether a credential is present, i.e. publish can be attempted
    pub fn is_configured(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Save settings to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create settings file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write settings to: {}", path.display()))?;
        Ok(())
    }

    /// Load settings from file, falling back to defaults when the file
    /// does not exist yet
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let file = File::open(path)
            .with_context(|| format!("Failed to open settings file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse settings from: {}", path.display()))
    }
}

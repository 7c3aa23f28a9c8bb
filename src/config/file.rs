//! Configuration file management
//!
//! Handles finding and loading configuration files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./integration-runner.yaml",
    "./integration-runner.yml",
    "./.integration-runner.yaml",
    "~/.config/integration-runner/config.yaml",
];

/// Configuration file structure; every field is optional
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Resulting log file
    pub output: Option<PathBuf>,

    /// Folder with the test executables
    pub folder: Option<PathBuf>,

    /// Number of parallel workers
    pub jobs: Option<usize>,

    /// Executables that need a clean environment per test case
    pub clean_env: Option<Vec<String>>,

    /// Executables to run when none are given on the command line
    pub include: Vec<String>,
}

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load the explicit file if given, otherwise the first one found
    pub fn load_or_find(explicit: Option<&Path>) -> Result<Option<Self>> {
        match explicit.map(Path::to_path_buf).or_else(Self::find) {
            Some(path) => Self::load(&path).map(Some),
            None => Ok(None),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        Ok(config)
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "INTEGRATION_RUNNER";

/// Configuration taken from `INTEGRATION_RUNNER_*` variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Log file from INTEGRATION_RUNNER_OUTPUT
    pub output: Option<PathBuf>,
    /// Tests folder from INTEGRATION_RUNNER_FOLDER
    pub folder: Option<PathBuf>,
    /// Worker count from INTEGRATION_RUNNER_JOBS
    pub jobs: Option<usize>,
    /// Config file from INTEGRATION_RUNNER_CONFIG
    pub config_file: Option<PathBuf>,
    /// Verbose from INTEGRATION_RUNNER_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from the process environment
    pub fn load() -> Self {
        Self::from_vars(env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let get = |name: &str| vars.get(&format!("{ENV_PREFIX}_{name}")).cloned();

        Self {
            output: get("OUTPUT").map(PathBuf::from),
            folder: get("FOLDER").map(PathBuf::from),
            jobs: get("JOBS").and_then(|v| v.parse().ok()),
            config_file: get("CONFIG").map(PathBuf::from),
            verbose: get("VERBOSE").map(|v| parse_bool(&v)),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.output.is_some()
            || self.folder.is_some()
            || self.jobs.is_some()
            || self.config_file.is_some()
            || self.verbose.is_some()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

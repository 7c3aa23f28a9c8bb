//! Configuration module
//!
//! Merges command-line flags, environment variables and the optional config
//! file into one [`RunnerConfig`]. Precedence, highest first: CLI, env, file,
//! built-in defaults.

mod env;
mod file;

pub use env::EnvConfig;
pub use file::ConfigFile;

use std::path::PathBuf;
use thiserror::Error;

use crate::cli::{split_names, Args};
use crate::executor::available_workers;

/// Default log file
pub const DEFAULT_OUTPUT: &str = "testlog.log";

/// Default folder with the test executables
pub const DEFAULT_FOLDER: &str = "omim-build-release/out/release";

/// Executables that always get a clean environment unless configured otherwise
pub const DEFAULT_CLEAN_ENV: &[&str] = &["search_integration_tests"];

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No tests to run were given; use -i/--include")]
    MissingIncludes,

    #[error("Worker count must be at least 1")]
    InvalidJobs,
}

/// Fully resolved run configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Log file, truncated at the start of the run
    pub output: PathBuf,

    /// Folder with the test executables
    pub folder: PathBuf,

    /// Requested executable names, in order, before the on-disk filter
    pub includes: Vec<String>,

    /// Executables that get a fresh resource directory per test case
    pub clean_env: Vec<String>,

    /// Number of parallel workers
    pub jobs: usize,
}

impl RunnerConfig {
    /// Resolve the final configuration
    pub fn resolve(
        args: &Args,
        env: &EnvConfig,
        file: Option<ConfigFile>,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        // An include that splits into no names is still an include.
        let includes = if !args.include.is_empty() {
            args.includes()
        } else if !file.include.is_empty() {
            split_names(&file.include)
        } else {
            return Err(ConfigError::MissingIncludes);
        };

        let jobs = args
            .jobs
            .or(env.jobs)
            .or(file.jobs)
            .unwrap_or_else(available_workers);
        if jobs == 0 {
            return Err(ConfigError::InvalidJobs);
        }

        let mut clean_env = file
            .clean_env
            .unwrap_or_else(|| DEFAULT_CLEAN_ENV.iter().map(|s| s.to_string()).collect());
        for name in args.clean_env() {
            if !clean_env.contains(&name) {
                clean_env.push(name);
            }
        }

        Ok(Self {
            output: args
                .output
                .clone()
                .or_else(|| env.output.clone())
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            folder: args
                .folder
                .clone()
                .or_else(|| env.folder.clone())
                .or(file.folder)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FOLDER)),
            includes,
            clean_env,
            jobs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["integration-runner"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::resolve(&args(&["-i", "a"]), &EnvConfig::default(), None).unwrap();

        assert_eq!(config.output, PathBuf::from("testlog.log"));
        assert_eq!(config.folder, PathBuf::from("omim-build-release/out/release"));
        assert_eq!(config.includes, vec!["a"]);
        assert_eq!(config.clean_env, vec!["search_integration_tests"]);
        assert_eq!(config.jobs, available_workers());
    }

    #[test]
    fn test_missing_includes() {
        let err = RunnerConfig::resolve(&args(&[]), &EnvConfig::default(), None).unwrap_err();
        assert_eq!(err, ConfigError::MissingIncludes);
    }

    #[test]
    fn test_empty_include_value_is_not_missing() {
        for value in ["", ","] {
            let config =
                RunnerConfig::resolve(&args(&["-i", value]), &EnvConfig::default(), None).unwrap();
            assert!(config.includes.is_empty());
        }
    }

    #[test]
    fn test_zero_jobs_is_rejected() {
        let err = RunnerConfig::resolve(&args(&["-i", "a", "-j", "0"]), &EnvConfig::default(), None)
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidJobs);
    }

    #[test]
    fn test_precedence() {
        let env = EnvConfig {
            folder: Some(PathBuf::from("/env/folder")),
            output: Some(PathBuf::from("env.log")),
            jobs: Some(5),
            ..Default::default()
        };
        let file = ConfigFile {
            folder: Some(PathBuf::from("/file/folder")),
            output: Some(PathBuf::from("file.log")),
            jobs: Some(7),
            clean_env: Some(vec!["stateful".to_string()]),
            include: vec!["from_file".to_string()],
        };

        let config = RunnerConfig::resolve(
            &args(&["-i", "a,b", "-o", "cli.log", "--clean-env", "other"]),
            &env,
            Some(file),
        )
        .unwrap();

        assert_eq!(config.output, PathBuf::from("cli.log"));
        assert_eq!(config.folder, PathBuf::from("/env/folder"));
        assert_eq!(config.jobs, 5);
        assert_eq!(config.includes, vec!["a", "b"]);
        assert_eq!(config.clean_env, vec!["stateful", "other"]);
    }

    #[test]
    fn test_includes_from_file() {
        let file = ConfigFile {
            include: vec!["x,y".to_string()],
            ..Default::default()
        };
        let config = RunnerConfig::resolve(&args(&[]), &EnvConfig::default(), Some(file)).unwrap();
        assert_eq!(config.includes, vec!["x", "y"]);
    }
}

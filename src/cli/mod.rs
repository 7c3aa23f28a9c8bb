//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

/// Runs the selected integration test executables in parallel, one test case per process
#[derive(Parser, Debug)]
#[command(name = "integration-runner")]
#[command(version)]
#[command(about = "Run integration test executables in parallel and collect their output")]
#[command(long_about = None)]
pub struct Args {
    /// Resulting log file [default: testlog.log]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Folder where the tests reside, absolute or relative to the current directory
    /// [default: omim-build-release/out/release]
    #[arg(short, long)]
    pub folder: Option<PathBuf>,

    /// Include tests into execution: comma separated names, repeatable.
    /// E.g.: -i one -i two -i three,four,five
    #[arg(short, long, value_name = "NAMES")]
    pub include: Vec<String>,

    /// Number of parallel workers [default: number of CPU cores]
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Also give these executables a fresh resource directory per test case
    #[arg(long = "clean-env", value_name = "NAMES")]
    pub clean_env: Vec<String>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Executable names from all `-i` values
    pub fn includes(&self) -> Vec<String> {
        split_names(&self.include)
    }

    /// Executable names from all `--clean-env` values
    pub fn clean_env(&self) -> Vec<String> {
        split_names(&self.clean_env)
    }
}

/// Split comma separated values, trimming items and dropping empty ones
pub fn split_names<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.as_ref().split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from([
            "integration-runner",
            "-o",
            "out.log",
            "--folder",
            "/opt/tests",
            "-i",
            "one",
            "-i",
            "two, three,four",
        ]);

        assert_eq!(args.output, Some(PathBuf::from("out.log")));
        assert_eq!(args.folder, Some(PathBuf::from("/opt/tests")));
        assert_eq!(args.includes(), vec!["one", "two", "three", "four"]);
        assert!(args.jobs.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_defaults_are_unset() {
        let args = Args::parse_from(["integration-runner"]);
        assert!(args.output.is_none());
        assert!(args.folder.is_none());
        assert!(args.includes().is_empty());
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_extra_flags() {
        let args = Args::parse_from([
            "integration-runner",
            "-i",
            "a",
            "-j",
            "3",
            "--clean-env",
            "a,b",
            "-c",
            "runner.yaml",
            "-v",
        ]);

        assert_eq!(args.jobs, Some(3));
        assert_eq!(args.clean_env(), vec!["a", "b"]);
        assert_eq!(args.config, Some(PathBuf::from("runner.yaml")));
        assert!(args.verbose);
    }

    #[test]
    fn test_split_names_drops_empty_items() {
        assert_eq!(split_names(&["a,,b", " ", ",c,"]), vec!["a", "b", "c"]);
    }
}

//! Integration Runner - parallel runner for precompiled integration tests
//!
//! Runs only the test executables it is told to, one test case per child
//! process, spread over all CPU cores, and collects every test case's
//! stderr and exit code into one flat log file.
//!
//! ## Usage
//!
//! ```bash
//! # Run two executables from the default build folder
//! integration-runner -i search_integration_tests,storage_integration_tests
//!
//! # Custom folder and log file
//! integration-runner -f out/release -o nightly.log -i one -i two
//!
//! # Limit parallelism and isolate another executable
//! integration-runner -i routing_integration_tests -j 4 --clean-env routing_integration_tests
//! ```

use anyhow::Result;
use clap::Parser;
use std::process;
use tracing::{debug, info, warn};

mod cli;
mod config;
mod executor;
mod models;
mod output;
mod utils;

use cli::Args;
use config::{ConfigError, ConfigFile, EnvConfig, RunnerConfig};
use executor::IntegrationRunner;
use utils::{init_logger, LogLevel};

/// Exit code when no tests to run were given
const EXIT_NO_INCLUDES: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let verbose = args.verbose || env.verbose.unwrap_or(false);
    init_logger(LogLevel::resolve(&args.log_level, verbose));
    if env.has_any() {
        debug!("Environment overrides: {:?}", env);
    }

    let explicit_config = args.config.clone().or_else(|| env.config_file.clone());
    let file = ConfigFile::load_or_find(explicit_config.as_deref())?;

    let config = match RunnerConfig::resolve(&args, &env, file) {
        Ok(config) => config,
        Err(ConfigError::MissingIncludes) => {
            warn!(
                "You must provide the list of tests to run. \
                 This runner doesn't run all the tests it finds, only the ones you specify."
            );
            process::exit(EXIT_NO_INCLUDES);
        }
        Err(e) => return Err(e.into()),
    };

    info!("Number of workers is: {}", config.jobs);
    debug!("Clean environment for: {:?}", config.clean_env);

    let runner = IntegrationRunner::new(config);
    let summary = runner.run().await?;

    if summary.failed_workers > 0 {
        warn!(
            "{} workers stopped on errors; {} of {} test cases were not logged",
            summary.failed_workers,
            summary.queued - summary.logged,
            summary.queued
        );
    }

    Ok(())
}

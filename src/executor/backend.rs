//! Process backend
//!
//! Launches test executables as child processes and captures their output.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

use super::error::ExecError;
use crate::models::CommandOutput;

/// Asks an executable for the names of its test cases
pub const LIST_TESTS_FLAG: &str = "--list_tests";

/// Restricts an executable to a single test case
pub const FILTER_FLAG: &str = "--filter";

/// Points an executable at its private resource directory
pub const RESOURCE_PATH_FLAG: &str = "--user_resource_path";

/// Runs executables that live in one tests folder
#[derive(Clone, Debug)]
pub struct ProcessBackend {
    folder: PathBuf,
}

impl ProcessBackend {
    /// Create a backend rooted at `folder`
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// Full path of an executable inside the tests folder
    pub fn executable_path(&self, executable: &str) -> PathBuf {
        self.folder.join(executable)
    }

    /// Run `executable` with `args` and wait for it to exit
    ///
    /// Stdout is split into lines with empty lines dropped. Stderr is kept
    /// as one string. A child that cannot be started is reported as
    /// [`ExecError::Launch`]; a non-zero exit is not an error.
    pub async fn run(&self, executable: &str, args: &[String]) -> Result<CommandOutput, ExecError> {
        let path = self.executable_path(executable);
        debug!(">> {} {}", path.display(), args.join(" "));

        let child = Command::new(&path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecError::Launch {
                path: path.clone(),
                source,
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ExecError::Wait { path, source })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout_lines = stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(CommandOutput {
            stdout_lines,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: exit_code(output.status),
        })
    }
}

/// Build the argument list for running one test case
pub fn filter_args(test_case: &str, resource_path: Option<&Path>) -> Vec<String> {
    let mut args = vec![format!("{FILTER_FLAG}={test_case}")];
    if let Some(dir) = resource_path {
        args.push(format!("{RESOURCE_PATH_FLAG}={}", dir.display()));
    }
    args
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| -sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

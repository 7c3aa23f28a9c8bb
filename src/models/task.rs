//! Task and result models
//!
//! Defines the unit of work handed to workers and what comes back from it.

use std::fmt;

/// One (executable, test case) pair to run and log
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Task {
    /// Executable name, relative to the tests folder
    pub executable: String,

    /// Test case name as printed by `--list_tests`
    pub test_case: String,
}

impl Task {
    pub fn new(executable: impl Into<String>, test_case: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            test_case: test_case.into(),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.executable, self.test_case)
    }
}

/// Raw output of one finished child process
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Non-empty stdout lines, in order
    pub stdout_lines: Vec<String>,

    /// Entire stderr, lossily decoded
    pub stderr: String,

    /// Exit code; `-signal` when the child was killed by a signal
    pub exit_code: i32,
}

/// Outcome of running a single task
///
/// Consumed once by the log writer and then dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    pub task: Task,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn new(task: Task, output: CommandOutput) -> Self {
        Self {
            task,
            stderr: output.stderr,
            exit_code: output.exit_code,
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.task, self.exit_code)
    }
}

/// Enumerated test cases of one executable
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub executable: String,
    pub test_cases: Vec<String>,
}

impl ManifestEntry {
    /// Expand into one task per test case
    pub fn tasks(&self) -> impl Iterator<Item = Task> + '_ {
        self.test_cases
            .iter()
            .map(|test_case| Task::new(self.executable.clone(), test_case.clone()))
    }
}

/// Everything a run will execute, built before any worker starts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunManifest {
    entries: Vec<ManifestEntry>,
}

impl RunManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, executable: impl Into<String>, test_cases: Vec<String>) {
        self.entries.push(ManifestEntry {
            executable: executable.into(),
            test_cases,
        });
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Total number of tasks across all executables
    pub fn task_count(&self) -> usize {
        self.entries.iter().map(|e| e.test_cases.len()).sum()
    }

    /// All tasks, executable by executable, in listing order
    pub fn tasks(&self) -> impl Iterator<Item = Task> + '_ {
        self.entries.iter().flat_map(ManifestEntry::tasks)
    }
}

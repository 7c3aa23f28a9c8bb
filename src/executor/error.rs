//! Executor error types

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Task;

/// Failures of a single child process invocation
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Failed to launch {}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to collect output of {}", path.display())]
    Wait {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures that end a worker while it runs a task
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task {task} failed")]
    Exec {
        task: Task,
        #[source]
        source: ExecError,
    },

    #[error("Could not create isolated environment for {task}")]
    IsolationSetup {
        task: Task,
        #[source]
        source: io::Error,
    },

    #[error("Could not write log entry for {task}")]
    LogWrite {
        task: Task,
        #[source]
        source: io::Error,
    },
}

/// `err` followed by each of its causes, separated by ": "
pub fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}

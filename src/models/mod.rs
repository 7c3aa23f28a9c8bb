//! Data models for the integration runner
//!
//! This module contains the data structures shared by the executor and the log writer.

mod task;

pub use task::{CommandOutput, ExecutionResult, RunManifest, Task};

//! Test execution engine
//!
//! Launches test executables, enumerates their test cases and drains the
//! resulting tasks with a pool of parallel workers.

mod backend;
mod enumerate;
mod error;
mod isolation;
mod pool;
mod queue;
mod runner;

#[cfg(all(test, unix))]
pub(crate) mod fixtures;

pub use pool::available_workers;
pub use runner::IntegrationRunner;

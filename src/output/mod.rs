//! Output handling
//!
//! Writes the consolidated test log.

mod log;

pub use log::LogAggregator;

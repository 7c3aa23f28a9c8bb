//! Shared utilities

pub mod disk;
pub mod logger;
pub mod timer;

pub use disk::{filter_runlist, tests_on_disk};
pub use logger::{init_logger, LogLevel};
pub use timer::Stopwatch;

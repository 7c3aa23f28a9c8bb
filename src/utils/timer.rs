//! Timer utilities
//!
//! Measures the phases of a run for the closing summary.

use std::time::{Duration, Instant};

/// Stopwatch with lap timing
#[derive(Debug)]
pub struct Stopwatch {
    start: Instant,
    laps: Vec<(String, Duration)>,
}

impl Stopwatch {
    /// Create a new stopwatch
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            laps: Vec::new(),
        }
    }

    /// Record a lap
    pub fn lap(&mut self, label: impl Into<String>) {
        let elapsed = self.start.elapsed();
        self.laps.push((label.into(), elapsed));
    }

    /// Get total elapsed time
    pub fn total(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get lap times (duration of each lap, not cumulative)
    pub fn lap_times(&self) -> Vec<(String, Duration)> {
        let mut result = Vec::new();
        let mut prev = Duration::ZERO;

        for (label, cumulative) in &self.laps {
            result.push((label.clone(), *cumulative - prev));
            prev = *cumulative;
        }

        result
    }

    /// One-line rendering, e.g. `enumerate 12ms, execute 3400ms, total 3412ms`
    pub fn format(&self) -> String {
        let mut parts: Vec<String> = self
            .lap_times()
            .into_iter()
            .map(|(label, duration)| format!("{} {}ms", label, duration.as_millis()))
            .collect();
        parts.push(format!("total {}ms", self.total().as_millis()));
        parts.join(", ")
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

//! PeakDetector trait for the detection service
//!
//! This module provides a common trait for peak detection implementations,
//! so the worker can run the built-in scipy-style detector in production and
//! a mock in tests.

use crate::analysis::find_peaks;
use crate::editor::TimeSeriesStore;
use crate::error::{Result, SigEditError};
use crate::types::PeakParams;
use std::collections::VecDeque;

/// Size of the rolling window for recent detection times
const RECENT_WINDOW_SIZE: usize = 50;

/// Statistics for detection runs
#[derive(Debug, Clone)]
pub struct DetectorStats {
    /// Total number of successful runs
    pub successful_runs: u64,
    /// Total number of failed runs
    pub failed_runs: u64,
    /// Total run time in microseconds
    pub total_run_time_us: u64,
    /// Maximum run time observed (microseconds)
    pub max_run_time_us: u64,
    /// Rolling window of recent run times
    pub recent_run_times: VecDeque<u64>,
}

impl Default for DetectorStats {
    fn default() -> Self {
        Self {
            successful_runs: 0,
            failed_runs: 0,
            total_run_time_us: 0,
            max_run_time_us: 0,
            recent_run_times: VecDeque::with_capacity(RECENT_WINDOW_SIZE),
        }
    }
}

impl DetectorStats {
    /// Calculate average run time in microseconds
    pub fn avg_run_time_us(&self) -> f64 {
        if self.successful_runs == 0 {
            0.0
        } else {
            self.total_run_time_us as f64 / self.successful_runs as f64
        }
    }

    /// Record a successful run
    pub fn record_success(&mut self, time_us: u64) {
        self.successful_runs += 1;
        self.total_run_time_us += time_us;
        self.max_run_time_us = self.max_run_time_us.max(time_us);

        self.recent_run_times.push_back(time_us);
        if self.recent_run_times.len() > RECENT_WINDOW_SIZE {
            self.recent_run_times.pop_front();
        }
    }

    /// Record a failed run
    pub fn record_failure(&mut self) {
        self.failed_runs += 1;
    }
}

/// Unified interface for peak detectors
///
/// Implementations must be `Send` so they can be moved onto the detection
/// worker thread.
#[cfg_attr(test, mockall::automock)]
pub trait PeakDetector: Send {
    /// Human-readable detector name for logs
    fn name(&self) -> &'static str;

    /// Detect peaks in the primary signal of `table`
    fn detect(&mut self, table: &TimeSeriesStore, params: &PeakParams) -> Result<Vec<usize>>;
}

/// Built-in detector following scipy `find_peaks` semantics
#[derive(Debug, Clone, Default)]
pub struct ScipyStyleDetector;

impl ScipyStyleDetector {
    pub fn new() -> Self {
        Self
    }
}

impl PeakDetector for ScipyStyleDetector {
    fn name(&self) -> &'static str {
        "scipy-style"
    }

    fn detect(&mut self, table: &TimeSeriesStore, params: &PeakParams) -> Result<Vec<usize>> {
        if table.is_empty() {
            return Err(SigEditError::Detection("No data provided.".to_string()));
        }
        find_peaks(table.primary(), params)
    }
}

//! Analysis module for signal processing
//!
//! This module provides signal analysis tools including:
//! - Local maxima detection with plateau handling
//! - Peak filtering by height, distance, prominence and width

pub mod peaks;

pub use peaks::{find_peaks, local_maxima, peak_prominences, peak_width, PeakWidth, Prominence};

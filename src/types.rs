//! Core data types for SigEdit-RS
//!
//! This module contains the plain data structures shared between the
//! editing core and its collaborators (ingestion, detection, charting).
//!
//! # Main Types
//!
//! - [`ChannelTable`] - Named numeric columns as produced by ingestion
//! - [`Sample`] - One index-aligned row across the three channels
//! - [`PeakParams`] - Optional thresholds forwarded to peak detection
//! - [`Rgb`] - Renderer-agnostic colour used in scene descriptors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Channel name of the time axis
pub const TIME_CHANNEL: &str = "time axis";

/// Channel name of the primary signal
pub const PRIMARY_CHANNEL: &str = "primary signal";

/// Channel name of the reference signal
pub const REFERENCE_CHANNEL: &str = "reference signal";

/// The three channels a table must carry to be loaded
pub const REQUIRED_CHANNELS: [&str; 3] = [TIME_CHANNEL, PRIMARY_CHANNEL, REFERENCE_CHANNEL];

/// A table of named numeric channels
///
/// Ingestion produces one of these; the store validates it on load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelTable {
    columns: BTreeMap<String, Vec<f64>>,
}

impl ChannelTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from the three canonical channels
    pub fn from_channels(time: Vec<f64>, primary: Vec<f64>, reference: Vec<f64>) -> Self {
        let mut table = Self::new();
        table.insert(TIME_CHANNEL, time);
        table.insert(PRIMARY_CHANNEL, primary);
        table.insert(REFERENCE_CHANNEL, reference);
        table
    }

    /// Insert or replace a channel
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.columns.insert(name.into(), values);
    }

    /// Get a channel by name
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Remove a channel, returning its values
    pub fn take(&mut self, name: &str) -> Option<Vec<f64>> {
        self.columns.remove(name)
    }

    /// Whether a channel is present
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Channel names in sorted order
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.columns.len()
    }
}

/// One row of the time series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub index: usize,
    pub time: f64,
    pub primary: f64,
    pub reference: f64,
}

/// Peak detection thresholds
///
/// Every option is optional; absent options do not constrain detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakParams {
    /// Minimum peak height
    #[serde(default)]
    pub height: Option<f64>,
    /// Minimum horizontal distance in samples between neighbouring peaks
    #[serde(default)]
    pub distance: Option<f64>,
    /// Minimum prominence
    #[serde(default)]
    pub prominence: Option<f64>,
    /// Minimum width in samples, measured at half prominence
    #[serde(default)]
    pub width: Option<f64>,
}

impl PeakParams {
    /// Recognized option names, in display order
    pub const OPTION_NAMES: [&'static str; 4] = ["height", "distance", "prominence", "width"];

    /// Look up an option by name
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "height" => self.height,
            "distance" => self.distance,
            "prominence" => self.prominence,
            "width" => self.width,
            _ => None,
        }
    }

    /// Set an option by name, returning false for unrecognized names
    pub fn set(&mut self, name: &str, value: Option<f64>) -> bool {
        let slot = match name {
            "height" => &mut self.height,
            "distance" => &mut self.distance,
            "prominence" => &mut self.prominence,
            "width" => &mut self.width,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Whether no option is set
    pub fn is_unconstrained(&self) -> bool {
        Self::OPTION_NAMES.iter().all(|n| self.get(n).is_none())
    }
}

/// An sRGB colour, independent of any rendering library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const PURPLE: Rgb = Rgb(128, 0, 128);
    pub const PINK: Rgb = Rgb(255, 192, 203);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
    pub const DARK_BLUE: Rgb = Rgb(0, 0, 139);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_channels_has_required() {
        let table = ChannelTable::from_channels(vec![0.0], vec![1.0], vec![2.0]);
        for name in REQUIRED_CHANNELS {
            assert!(table.contains(name));
        }
        assert_eq!(table.channel_count(), 3);
        assert_eq!(table.get(PRIMARY_CHANNEL), Some(&[1.0][..]));
    }

    #[test]
    fn test_peak_params_by_name() {
        let mut params = PeakParams::default();
        assert!(params.is_unconstrained());
        assert!(params.set("prominence", Some(2.5)));
        assert!(!params.set("threshold", Some(1.0)));
        assert_eq!(params.get("prominence"), Some(2.5));
        assert_eq!(params.get("threshold"), None);
        assert!(!params.is_unconstrained());
    }

    #[test]
    fn test_peak_params_serde_missing_fields() {
        let params: PeakParams = serde_json::from_str(r#"{"height": 10.0}"#).unwrap();
        assert_eq!(params.height, Some(10.0));
        assert_eq!(params.width, None);
    }
}

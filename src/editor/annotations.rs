//! Peak overlays and categorized custom markers
//!
//! Peaks are replaced wholesale by each accepted detection response. Custom
//! markers are appended by the operator and only cleared when a new file is
//! loaded.
//!
//! # Staleness
//!
//! Peak indices refer to the store as it was when detection was requested.
//! They are not re-validated after a delete; renderers skip indices that no
//! longer exist.

use crate::error::EditorError;
use crate::types::Rgb;
use serde::{Deserialize, Serialize};

/// Category of a custom marker, each with a fixed colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerCategory {
    /// Key `0` (pink)
    Zero,
    /// Key `1` (cyan)
    One,
    /// Key `2` (red)
    Two,
    /// Key `3` (dark blue)
    Three,
}

impl MarkerCategory {
    /// Parse a category from its keyboard key
    pub fn from_key(key: &str) -> Result<Self, EditorError> {
        match key {
            "0" => Ok(MarkerCategory::Zero),
            "1" => Ok(MarkerCategory::One),
            "2" => Ok(MarkerCategory::Two),
            "3" => Ok(MarkerCategory::Three),
            other => Err(EditorError::InvalidCategory(other.to_string())),
        }
    }

    /// The keyboard key bound to this category
    pub fn key(&self) -> &'static str {
        match self {
            MarkerCategory::Zero => "0",
            MarkerCategory::One => "1",
            MarkerCategory::Two => "2",
            MarkerCategory::Three => "3",
        }
    }

    /// Fixed display colour
    pub fn color(&self) -> Rgb {
        match self {
            MarkerCategory::Zero => Rgb::PINK,
            MarkerCategory::One => Rgb::CYAN,
            MarkerCategory::Two => Rgb::RED,
            MarkerCategory::Three => Rgb::DARK_BLUE,
        }
    }

    /// Get all categories
    pub fn all() -> &'static [MarkerCategory] {
        &[
            MarkerCategory::Zero,
            MarkerCategory::One,
            MarkerCategory::Two,
            MarkerCategory::Three,
        ]
    }
}

/// A user-placed vertical marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomMarker {
    /// Position on the time axis
    pub x: f64,
    pub category: MarkerCategory,
}

impl CustomMarker {
    pub fn color(&self) -> Rgb {
        self.category.color()
    }
}

/// Detected peaks plus custom markers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSet {
    peaks: Vec<usize>,
    custom: Vec<CustomMarker>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the peak set with a detection result
    pub fn replace_peaks(&mut self, indices: Vec<usize>) {
        tracing::debug!(count = indices.len(), "Replacing peak overlay");
        self.peaks = indices;
    }

    /// Append a custom marker for a category key
    ///
    /// Unknown keys are rejected and nothing is appended.
    pub fn add_custom_marker(&mut self, x: f64, category_key: &str) -> Result<CustomMarker, EditorError> {
        let category = MarkerCategory::from_key(category_key)?;
        let marker = CustomMarker { x, category };
        self.custom.push(marker);
        Ok(marker)
    }

    pub fn clear(&mut self) {
        self.peaks.clear();
        self.custom.clear();
    }

    pub fn peaks(&self) -> &[usize] {
        &self.peaks
    }

    pub fn custom_markers(&self) -> &[CustomMarker] {
        &self.custom
    }
}

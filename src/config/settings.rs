//! User settings loaded from `settings.toml`
//!
//! Settings are grouped into sections that mirror the parts of the
//! application they tune:
//!
//! - [`ChannelsConfig`] - Column names mapped to the three channels
//! - [`DetectionConfig`] - Debounce delay, default parameters and slider ranges
//! - [`UiConfig`] - Theme and scene colours/widths
//! - [`IngestConfig`] - File size and extension limits
//!
//! Every field has a default, so a partial file only overrides what it names.

use crate::config::ensure_app_data_dir;
use crate::editor::{EditorConfig, SceneStyle};
use crate::error::{Result, SigEditError};
use crate::types::PeakParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings filename
pub const SETTINGS_FILE: &str = "settings.toml";

/// Default maximum accepted data file size (16 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;

/// Default debounce delay for detection in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Complete user configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub channels: ChannelsConfig,
    pub detection: DetectionConfig,
    pub ui: UiConfig,
    pub ingest: IngestConfig,
}

impl AppConfig {
    /// Load settings from a TOML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SigEditError::Config(format!("Failed to read settings {:?}: {}", path, e))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            SigEditError::Config(format!("Failed to parse settings {:?}: {}", path, e))
        })?;
        config.detection.sliders.validate()?;
        Ok(config)
    }

    /// Save settings to a TOML file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SigEditError::Serialization(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| SigEditError::Config(format!("Failed to write settings: {}", e)))
    }

    /// Load settings from the app data directory
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = super::settings_path().ok_or_else(|| {
            SigEditError::Config("Could not determine settings path".to_string())
        })?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load settings, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save settings to the app data directory
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(SETTINGS_FILE))
    }

    /// Editor construction parameters derived from these settings
    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            debounce: self.detection.debounce(),
            style: self.ui.scene.clone(),
        }
    }
}

// ==================== Channels ====================

/// File column names for each channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    /// Column holding the time axis
    pub time: String,
    /// Column holding the primary signal
    pub primary: String,
    /// Column holding the reference signal
    pub reference: String,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            time: "Elapsed Time".to_string(),
            primary: "Bladder Pressure".to_string(),
            reference: "Scale".to_string(),
        }
    }
}

impl ChannelsConfig {
    /// Column names in time, primary, reference order
    pub fn names(&self) -> [&str; 3] {
        [&self.time, &self.primary, &self.reference]
    }
}

// ==================== Detection ====================

/// Range of one parameter slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Finite bounds with `min <= max` and a non-negative step
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max && self.step >= 0.0
    }

    /// Clamp a value into the range; an invalid range leaves it unchanged
    pub fn clamp(&self, value: f64) -> f64 {
        if !self.is_valid() {
            return value;
        }
        value.max(self.min).min(self.max)
    }
}

/// Slider ranges for each detection parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderRanges {
    pub height: SliderRange,
    pub distance: SliderRange,
    pub prominence: SliderRange,
    pub width: SliderRange,
}

impl Default for SliderRanges {
    fn default() -> Self {
        Self {
            height: SliderRange::new(0.0, 200.0, 1.0),
            distance: SliderRange::new(1.0, 500.0, 1.0),
            prominence: SliderRange::new(0.0, 100.0, 0.5),
            width: SliderRange::new(0.0, 200.0, 1.0),
        }
    }
}

impl SliderRanges {
    /// Range for a parameter by its option name
    pub fn get(&self, name: &str) -> Option<&SliderRange> {
        match name {
            "height" => Some(&self.height),
            "distance" => Some(&self.distance),
            "prominence" => Some(&self.prominence),
            "width" => Some(&self.width),
            _ => None,
        }
    }

    /// Reject ranges the parameter panel cannot display
    pub fn validate(&self) -> Result<()> {
        for name in PeakParams::OPTION_NAMES {
            if let Some(range) = self.get(name).filter(|r| !r.is_valid()) {
                return Err(SigEditError::Config(format!(
                    "Invalid slider range for `{}`: min={}, max={}, step={}",
                    name, range.min, range.max, range.step
                )));
            }
        }
        Ok(())
    }
}

/// Peak detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Quiet period after the last parameter change before detection runs
    pub debounce_ms: u64,
    /// Parameters in effect when a file is opened
    pub defaults: PeakParams,
    /// Slider ranges shown in the parameter panel
    pub sliders: SliderRanges,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            defaults: PeakParams::default(),
            sliders: SliderRanges::default(),
        }
    }
}

impl DetectionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

// ==================== UI ====================

/// Display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Enable dark mode
    pub dark_mode: bool,
    /// Trace and marker appearance
    pub scene: SceneStyle,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dark_mode: true,
            scene: SceneStyle::default(),
        }
    }
}

// ==================== Ingest ====================

/// Limits applied when opening data files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Largest accepted file in bytes
    pub max_file_bytes: u64,
    /// Accepted file extensions, lowercase without the dot
    pub allowed_extensions: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            allowed_extensions: vec!["csv".to_string(), "txt".to_string()],
        }
    }
}

impl IngestConfig {
    /// Whether `extension` is accepted, ignoring case
    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.detection.debounce(), Duration::from_millis(300));
        assert_eq!(
            config.channels.names(),
            ["Elapsed Time", "Bladder Pressure", "Scale"]
        );
        assert_eq!(config.ingest.max_file_bytes, 16 * 1024 * 1024);
        assert!(config.ingest.allows_extension("CSV"));
        assert!(!config.ingest.allows_extension("xlsx"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [channels]
            primary = "Pressure"

            [detection]
            debounce_ms = 150
            "#,
        )
        .unwrap();

        assert_eq!(config.channels.primary, "Pressure");
        assert_eq!(config.channels.time, "Elapsed Time");
        assert_eq!(config.detection.debounce_ms, 150);
        assert_eq!(config.detection.sliders, SliderRanges::default());
        assert!(config.ui.dark_mode);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let mut config = AppConfig::default();
        config.detection.defaults.height = Some(12.0);
        config.ui.scene.peak_color = Rgb(10, 20, 30);
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "detection = 5").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SigEditError::Config(_)));
    }

    #[test]
    fn test_editor_config_follows_settings() {
        let mut config = AppConfig::default();
        config.detection.debounce_ms = 50;
        config.ui.scene.line_width = 3.0;

        let editor_config = config.editor_config();
        assert_eq!(editor_config.debounce, Duration::from_millis(50));
        assert_eq!(editor_config.style.line_width, 3.0);
    }

    #[test]
    fn test_slider_lookup_and_clamp() {
        let sliders = SliderRanges::default();
        for name in PeakParams::OPTION_NAMES {
            assert!(sliders.get(name).is_some());
        }
        assert!(sliders.get("threshold").is_none());
        assert_eq!(sliders.distance.clamp(0.0), 1.0);
    }

    #[test]
    fn test_inverted_slider_range_does_not_panic() {
        let inverted = SliderRange::new(10.0, 0.0, 1.0);
        assert!(!inverted.is_valid());
        assert_eq!(inverted.clamp(5.0), 5.0);
        assert_eq!(SliderRange::new(f64::NAN, 1.0, 0.1).clamp(3.0), 3.0);
    }

    #[test]
    fn test_inverted_slider_range_rejected_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(
            &path,
            "[detection.sliders.height]\nmin = 10.0\nmax = 0.0\nstep = 1.0\n",
        )
        .unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SigEditError::Config(_)));
        assert!(err.to_string().contains("height"));
    }
}

//! Configuration module for SigEdit-RS
//!
//! This module handles application configuration including:
//! - User settings (`settings.toml`) covering channel names, detection,
//!   display and ingestion limits
//! - Application state persistence (recent files, last export directory)
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.sigedit.sigedit-rs/`
//! - **macOS**: `~/Library/Application Support/dev.sigedit.sigedit-rs/`
//! - **Windows**: `%APPDATA%\dev.sigedit.sigedit-rs\`
//!
//! # Files
//!
//! - `settings.toml` - User settings, see [`AppConfig`]
//! - `app_state.json` - Recent files list and last used directories
//! - `logs/` - Daily rolling log files
//!
//! # Example
//!
//! ```ignore
//! use sigedit_rs::config::{AppConfig, AppState};
//!
//! let config = AppConfig::load_or_default();
//! let mut state = AppState::load_or_default();
//!
//! state.add_recent_file("session_01.csv");
//! state.save()?;
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{Result, SigEditError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.sigedit.sigedit-rs";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Log directory name inside the app data directory
pub const LOG_DIR: &str = "logs";

/// Maximum number of recent files to remember
pub const MAX_RECENT_FILES: usize = 10;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        SigEditError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            SigEditError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

/// Get the path to the settings file
pub fn settings_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(SETTINGS_FILE))
}

/// Get the log directory, creating it if needed
pub fn ensure_log_dir() -> Result<PathBuf> {
    let dir = ensure_app_data_dir()?.join(LOG_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

// ==================== Recent File Entry ====================

/// A recently opened data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentFile {
    /// Path to the data file
    pub path: PathBuf,

    /// Display name (file name component)
    pub name: String,

    /// When the file was last opened
    pub last_opened: DateTime<Utc>,
}

impl RecentFile {
    /// Create a new entry stamped with the current time
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            last_opened: Utc::now(),
        }
    }

    /// Check if the file still exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

// ==================== App State ====================

/// Persistent application state
///
/// History that survives restarts, kept apart from user settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Recently opened data files, most recent first
    #[serde(default)]
    pub recent_files: Vec<RecentFile>,

    /// Directory of the last export
    #[serde(default)]
    pub last_export_dir: Option<PathBuf>,
}

fn default_app_state_version() -> u32 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            recent_files: Vec::new(),
            last_export_dir: None,
        }
    }
}

impl AppState {
    /// Load app state from a specific file
    ///
    /// A missing file yields defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SigEditError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| SigEditError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            SigEditError::Config("Could not determine app state path".to_string())
        })?;
        Self::load_from(path)
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to a specific file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SigEditError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| SigEditError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(APP_STATE_FILE))
    }

    /// Add or refresh a recent file
    pub fn add_recent_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();

        self.recent_files.retain(|f| f.path != path);
        self.recent_files.insert(0, RecentFile::new(path));
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    /// Remove a file from recents (e.g. it failed to open)
    pub fn remove_recent_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.recent_files.retain(|f| f.path != path);
    }

    /// Drop recent entries whose files no longer exist
    pub fn cleanup_missing_files(&mut self) {
        self.recent_files.retain(|f| f.exists());
    }

    /// Remember the directory of an exported file
    pub fn record_export(&mut self, exported: impl AsRef<Path>) {
        self.last_export_dir = exported.as_ref().parent().map(Path::to_path_buf);
    }
}

// ==================== Utilities ====================

/// Helper to format bytes as human-readable size
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_app_state_default() {
        let state = AppState::default();
        assert!(state.recent_files.is_empty());
        assert!(state.last_export_dir.is_none());
        assert_eq!(state.version, 1);
    }

    #[test]
    fn test_add_recent_file() {
        let mut state = AppState::default();

        state.add_recent_file("/data/run1.csv");
        assert_eq!(state.recent_files.len(), 1);
        assert_eq!(state.recent_files[0].name, "run1.csv");

        state.add_recent_file("/data/run2.txt");
        assert_eq!(state.recent_files.len(), 2);
        assert_eq!(state.recent_files[0].name, "run2.txt"); // Most recent first

        // Re-opening moves the entry to the front without duplicating
        state.add_recent_file("/data/run1.csv");
        assert_eq!(state.recent_files.len(), 2);
        assert_eq!(state.recent_files[0].name, "run1.csv");
    }

    #[test]
    fn test_recent_files_max_limit() {
        let mut state = AppState::default();

        for i in 0..15 {
            state.add_recent_file(format!("/data/run{}.csv", i));
        }

        assert_eq!(state.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(state.recent_files[0].name, "run14.csv");
    }

    #[test]
    fn test_remove_and_cleanup() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("kept.csv");
        std::fs::write(&existing, "x").unwrap();

        let mut state = AppState::default();
        state.add_recent_file(&existing);
        state.add_recent_file(dir.path().join("gone.csv"));
        state.add_recent_file("/data/other.csv");

        state.remove_recent_file("/data/other.csv");
        assert_eq!(state.recent_files.len(), 2);

        state.cleanup_missing_files();
        assert_eq!(state.recent_files.len(), 1);
        assert_eq!(state.recent_files[0].path, existing);
    }

    #[test]
    fn test_app_state_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(APP_STATE_FILE);

        let mut state = AppState::default();
        state.add_recent_file("/data/run.csv");
        state.record_export("/exports/edited.csv");
        state.save_to(&path).unwrap();

        let parsed = AppState::load_from(&path).unwrap();
        assert_eq!(parsed.recent_files.len(), 1);
        assert_eq!(parsed.last_export_dir, Some(PathBuf::from("/exports")));
    }

    #[test]
    fn test_missing_state_file_yields_default() {
        let dir = tempdir().unwrap();
        let state = AppState::load_from(dir.path().join("absent.json")).unwrap();
        assert!(state.recent_files.is_empty());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(500), "500 bytes");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(16 * 1024 * 1024), "16.00 MB");
        assert_eq!(format_file_size(2 * 1024 * 1024 * 1024), "2.00 GB");
    }
}

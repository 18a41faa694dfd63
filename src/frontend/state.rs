//! Action types for the frontend
//!
//! Panels never mutate application state directly. They return
//! [`AppAction`]s which the app applies after the frame's widgets are laid
//! out, so borrow scopes stay short.

use std::path::PathBuf;

use crate::types::PeakParams;

/// Actions that any panel can emit
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Show the native open dialog
    OpenFileDialog,
    /// Load a data file
    OpenFile(PathBuf),
    /// Show the native save dialog and export
    ExportDialog,
    /// Forget all recent files
    ClearRecentFiles,
    /// Delete the interval between the two selected points
    DeleteSelection,
    /// Undo the last delete
    Undo,
    /// Show or hide the detection parameter panel
    ToggleSliders,
    /// Detection parameters changed (debounced)
    ParamsChanged(PeakParams),
    /// Run detection immediately
    DetectNow,
    /// Switch between dark and light visuals
    SetDarkMode(bool),
    /// Close the application window
    Quit,
}

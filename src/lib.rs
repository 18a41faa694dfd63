//! # SigEdit-RS: Interactive Time-Series Editor
//!
//! An editor for two-channel recordings (a primary signal plus a reference
//! signal over a shared time axis). The operator selects two points and
//! deletes the interval between them, undoes the last delete, tunes peak
//! detection with debounced sliders, and drops categorized vertical markers
//! with the number keys.
//!
//! ## Architecture
//!
//! - **Editor**: Owns all session state and turns input events into a
//!   renderable scene. No UI, threading or I/O dependencies.
//! - **Backend**: Runs peak detection on a worker thread
//! - **Frontend**: Renders the UI using eframe/egui with egui_plot for graphs
//! - **Communication**: Crossbeam channels between UI and detection worker;
//!   sequence numbers make the newest request win
//!
//! ## Configuration
//!
//! Settings and application state are stored in the platform-appropriate
//! data directory under `dev.sigedit.sigedit-rs`:
//!
//! - **Linux**: `~/.local/share/dev.sigedit.sigedit-rs/`
//! - **macOS**: `~/Library/Application Support/dev.sigedit.sigedit-rs/`
//! - **Windows**: `%APPDATA%\dev.sigedit.sigedit-rs\`
//!
//! ## Example
//!
//! ```ignore
//! use sigedit_rs::{
//!     backend::{DetectionBackend, ScipyStyleDetector},
//!     config::{AppConfig, AppState},
//!     frontend::SigEditApp,
//! };
//!
//! fn main() -> eframe::Result<()> {
//!     let config = AppConfig::load_or_default();
//!     let app_state = AppState::load_or_default();
//!
//!     let (backend, bridge) = DetectionBackend::new(Box::new(ScipyStyleDetector::new()));
//!     std::thread::spawn(move || backend.run());
//!
//!     eframe::run_native(
//!         "SigEdit",
//!         eframe::NativeOptions::default(),
//!         Box::new(|cc| Ok(Box::new(SigEditApp::new(cc, bridge, config, app_state, None)))),
//!     )
//! }
//! ```

pub mod analysis;
pub mod app;
pub mod backend;
pub mod config;
pub mod editor;
pub mod error;
pub mod frontend;
pub mod ingest;
pub mod types;

// Re-export commonly used types
pub use app::SigEditApp;
pub use backend::{DetectionBackend, DetectionBridge, DetectionCommand, DetectionMessage};
pub use config::{AppConfig, AppState};
pub use editor::{Editor, EditorConfig, InputEvent, Scene};
pub use error::{EditorError, Result, SigEditError};
pub use types::{ChannelTable, PeakParams, Rgb};

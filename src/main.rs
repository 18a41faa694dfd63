//! SigEdit-RS - Main Entry Point
//!
//! Interactive editor for two-channel time-series recordings: select and
//! delete sample ranges, detect peaks, and drop categorized markers.
//!
//! Usage: `sigedit-rs [DATA_FILE]`

use anyhow::Context;
use sigedit_rs::{
    backend::{DetectionBackend, ScipyStyleDetector},
    config::{self, AppConfig, AppState},
    frontend::SigEditApp,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging; the guard flushes the file writer on drop
    let (file_writer, _log_guard) = match config::ensure_log_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "sigedit.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sigedit_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_writer.map(|writer| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
        }))
        .init();

    tracing::info!("Starting SigEdit");

    let config = AppConfig::load_or_default();

    // Load application state (recent files, last export directory)
    let mut app_state = AppState::load_or_default();
    app_state.cleanup_missing_files();

    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    // Spawn the detection worker
    let (backend, bridge) = DetectionBackend::new(Box::new(ScipyStyleDetector::new()));
    let backend_handle = backend
        .spawn()
        .context("Failed to spawn detection worker")?;

    // Configure eframe options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("SigEdit"),
        ..Default::default()
    };

    // Run the eframe application
    let result = eframe::run_native(
        "SigEdit",
        native_options,
        Box::new(|cc| {
            Ok(Box::new(SigEditApp::new(
                cc,
                bridge,
                config,
                app_state,
                initial_file,
            )))
        }),
    );

    // The app sends Shutdown on exit; wait for the worker to drain
    tracing::info!("Shutting down...");
    if backend_handle.join().is_err() {
        tracing::warn!("Detection worker panicked");
    }

    result.map_err(|e| anyhow::anyhow!("UI error: {}", e))
}

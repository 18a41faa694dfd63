//! Frontend module for egui UI
//!
//! This module provides the main UI components using eframe/egui. It turns
//! widget and pointer input into editor [`InputEvent`]s, renders the editor's
//! [`Scene`](crate::editor::Scene), and exchanges detection requests and
//! responses with the detection worker through a [`DetectionBridge`].
//!
//! # Layout
//!
//! - Menu bar: file open, recent files, export, theme
//! - Toolbar: Delete, Undo, Find Peaks
//! - Parameter panel (toggled by Find Peaks)
//! - Plot with both signals and overlay markers
//! - Status bar: counts, selected points, last error
//!
//! # Submodules
//!
//! - `plot` - Scene rendering and pointer mapping with egui_plot
//! - `sliders` - Detection parameter panel
//! - `toolbar`, `status_bar` - Top and bottom bars
//! - `markers` - Overlay colours and legend names

pub mod markers;
mod plot;
pub mod sliders;
pub mod state;
mod status_bar;
mod toolbar;

pub use plot::{PlotInteraction, PlotView, CLICK_RADIUS};
pub use sliders::PeakSliderState;
pub use state::AppAction;

use status_bar::{render_status_bar, StatusBarContext};
use toolbar::{render_toolbar, ToolbarContext};

use crate::backend::{DetectionBridge, DetectionMessage};
use crate::config::{AppConfig, AppState};
use crate::editor::{
    DetectionRequest, Editor, EditorKey, EditorOutcome, InputEvent, ResponseDisposition, Scene,
};
use crate::error::{Result, SigEditError};
use crate::ingest;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Repaint interval while a detection reply is outstanding
const DETECTION_REPAINT_INTERVAL: Duration = Duration::from_millis(30);

/// Map an egui key to the editor's key set
pub fn editor_key(key: egui::Key) -> Option<EditorKey> {
    use egui::Key;

    match key {
        Key::Escape => Some(EditorKey::Escape),
        Key::Backspace => Some(EditorKey::Backspace),
        Key::Num0 => Some(EditorKey::Char('0')),
        Key::Num1 => Some(EditorKey::Char('1')),
        Key::Num2 => Some(EditorKey::Char('2')),
        Key::Num3 => Some(EditorKey::Char('3')),
        _ => None,
    }
}

/// Main application state for the signal editor
pub struct SigEditApp {
    // === Communication ===
    detection: DetectionBridge,

    // === Shared State ===
    config: AppConfig,
    app_state: AppState,
    editor: Editor,
    last_error: Option<String>,
    file_path: Option<PathBuf>,

    // === View State ===
    plot_view: PlotView,
    scene: Scene,
    scene_dirty: bool,
    sliders: PeakSliderState,
    sliders_open: bool,
}

impl SigEditApp {
    /// Create a new application instance
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        detection: DetectionBridge,
        config: AppConfig,
        app_state: AppState,
        initial_file: Option<PathBuf>,
    ) -> Self {
        if config.ui.dark_mode {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
        } else {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
        }

        let editor = Editor::new(config.editor_config());
        let scene = editor.scene();
        let sliders = PeakSliderState::new(&config.detection.defaults, &config.detection.sliders);

        let mut app = Self {
            detection,
            config,
            app_state,
            editor,
            last_error: None,
            file_path: None,
            plot_view: PlotView::default(),
            scene,
            scene_dirty: false,
            sliders,
            sliders_open: false,
        };

        if let Some(path) = initial_file {
            app.handle_action(AppAction::OpenFile(path));
        }
        app
    }

    /// Apply detection responses; returns true if any arrived
    fn process_detection_messages(&mut self) -> bool {
        let messages = self.detection.drain();
        let had_messages = !messages.is_empty();

        for msg in messages {
            match msg {
                DetectionMessage::Result(response) => {
                    match self.editor.apply_detection(response) {
                        ResponseDisposition::Applied { .. } => {
                            self.scene_dirty = true;
                        }
                        ResponseDisposition::Failed(message) => {
                            self.last_error = Some(format!("Peak detection failed: {}", message));
                        }
                        ResponseDisposition::Stale => {}
                    }
                }
                DetectionMessage::Shutdown => {
                    tracing::info!("Detection worker shutdown received");
                }
            }
        }

        had_messages
    }

    /// Deliver one input event to the editor
    fn dispatch(&mut self, event: InputEvent) {
        match self.editor.handle(event, Instant::now()) {
            Ok(EditorOutcome::Redraw) => self.scene_dirty = true,
            Ok(EditorOutcome::Detect(request)) => self.submit_detection(request),
            Ok(EditorOutcome::NoChange) => {}
            Err(e) => {
                tracing::warn!("Edit rejected: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Send a request to the worker; an undelivered one is not waited on
    fn submit_detection(&mut self, request: DetectionRequest) {
        let seq = request.seq;
        if !self.detection.submit(request) {
            self.editor.abandon_detection(seq);
            self.last_error = Some("Peak detection is unavailable".to_string());
        }
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::OpenFileDialog => {
                if let Some(path) = rfd::FileDialog::new()
                    .set_title("Open Data File")
                    .add_filter("Data files", self.config.ingest.allowed_extensions.as_slice())
                    .pick_file()
                {
                    self.handle_action(AppAction::OpenFile(path));
                }
            }
            AppAction::OpenFile(path) => match self.open_file(&path) {
                Ok(()) => {
                    self.last_error = None;
                    self.app_state.add_recent_file(&path);
                    self.file_path = Some(path);
                }
                Err(e) => {
                    tracing::warn!("Failed to open {:?}: {}", path, e);
                    if !path.exists() {
                        self.app_state.remove_recent_file(&path);
                    }
                    self.last_error = Some(e.to_string());
                }
            },
            AppAction::ExportDialog => {
                if self.editor.store().is_empty() {
                    self.last_error = Some("No data to export.".to_string());
                    return;
                }
                let mut dialog = rfd::FileDialog::new()
                    .set_title("Export Data")
                    .add_filter("CSV", &["csv"])
                    .set_file_name(ingest::export_file_name(chrono::Local::now()));
                if let Some(dir) = &self.app_state.last_export_dir {
                    dialog = dialog.set_directory(dir);
                }
                if let Some(path) = dialog.save_file() {
                    if let Err(e) = self.export_to(&path) {
                        tracing::warn!("Export failed: {}", e);
                        self.last_error = Some(e.to_string());
                    }
                }
            }
            AppAction::ClearRecentFiles => {
                self.app_state.recent_files.clear();
            }
            AppAction::DeleteSelection => self.dispatch(InputEvent::DeleteSelection),
            AppAction::Undo => self.dispatch(InputEvent::Undo),
            AppAction::ToggleSliders => {
                self.sliders_open = !self.sliders_open;
            }
            AppAction::ParamsChanged(params) => self.dispatch(InputEvent::ParamsChanged(params)),
            AppAction::DetectNow => self.dispatch(InputEvent::DetectNow),
            AppAction::SetDarkMode(dark) => {
                self.config.ui.dark_mode = dark;
            }
            AppAction::Quit => {}
        }
    }

    fn open_file(&mut self, path: &Path) -> Result<()> {
        let table = ingest::read_table(path, &self.config.channels, &self.config.ingest)?;
        self.editor.load(table).map_err(SigEditError::from)?;
        self.plot_view.reset_view();
        self.scene_dirty = true;
        Ok(())
    }

    fn export_to(&mut self, path: &Path) -> Result<()> {
        ingest::export_csv(path, self.editor.store(), &self.config.channels)?;
        self.app_state.record_export(path);
        Ok(())
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::Key;

        // Text fields keep their keys
        if ctx.wants_keyboard_input() {
            return;
        }

        let mut editor_keys = Vec::new();
        let mut undo = false;
        let mut open = false;
        let mut export = false;

        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } = event
                {
                    if !modifiers.any() {
                        if let Some(k) = editor_key(*key) {
                            editor_keys.push(k);
                        }
                    }
                }
            }

            if i.key_pressed(Key::Z) && i.modifiers.command_only() {
                undo = true;
            }
            if i.key_pressed(Key::O) && i.modifiers.command_only() {
                open = true;
            }
            if i.key_pressed(Key::E) && i.modifiers.command_only() {
                export = true;
            }
        });

        for key in editor_keys {
            self.dispatch(InputEvent::Key(key));
        }
        if undo && self.editor.can_undo() {
            self.handle_action(AppAction::Undo);
        }
        if open {
            self.handle_action(AppAction::OpenFileDialog);
        }
        if export {
            self.handle_action(AppAction::ExportDialog);
        }
    }

    /// Issue the debounced detection request once it is due
    fn poll_detection(&mut self) {
        if let Some(request) = self.editor.poll(Instant::now()) {
            self.submit_detection(request);
        }
    }

    /// Wake up for the next debounce deadline and until the reply lands
    fn schedule_detection_repaint(&self, ctx: &egui::Context) {
        if let Some(deadline) = self.editor.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        } else if self.editor.recompute().awaiting_response() {
            ctx.request_repaint_after(DETECTION_REPAINT_INTERVAL);
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) -> Vec<AppAction> {
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open…").clicked() {
                        actions.push(AppAction::OpenFileDialog);
                        ui.close();
                    }

                    ui.menu_button("Open Recent", |ui| {
                        if self.app_state.recent_files.is_empty() {
                            ui.label("No recent files");
                        }
                        for recent in &self.app_state.recent_files {
                            if ui
                                .button(recent.name.as_str())
                                .on_hover_text(recent.path.display().to_string())
                                .clicked()
                            {
                                actions.push(AppAction::OpenFile(recent.path.clone()));
                                ui.close();
                            }
                        }
                        ui.separator();
                        if ui.button("Clear Recent").clicked() {
                            actions.push(AppAction::ClearRecentFiles);
                            ui.close();
                        }
                    });

                    let has_data = !self.editor.store().is_empty();
                    if ui.add_enabled(has_data, egui::Button::new("Export…")).clicked() {
                        actions.push(AppAction::ExportDialog);
                        ui.close();
                    }

                    ui.separator();
                    if ui.button("Quit").clicked() {
                        actions.push(AppAction::Quit);
                        ui.close();
                    }
                });

                ui.menu_button("View", |ui| {
                    let mut dark = self.config.ui.dark_mode;
                    if ui.checkbox(&mut dark, "Dark mode").changed() {
                        actions.push(AppAction::SetDarkMode(dark));
                    }
                    ui.checkbox(&mut self.plot_view.show_legend, "Legend");
                    ui.checkbox(&mut self.plot_view.show_grid, "Grid");
                    if ui.button("Reset View").clicked() {
                        self.plot_view.reset_view();
                        ui.close();
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(markers::key_hint()).small().weak());
                });
            });
        });

        actions
    }
}

impl eframe::App for SigEditApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.process_detection_messages() {
            ctx.request_repaint();
        }
        self.handle_keyboard_shortcuts(ctx);
        self.poll_detection();

        let mut actions = self.render_menu_bar(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let file_name = self
                .file_path
                .as_ref()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str());
            let toolbar_ctx = ToolbarContext {
                can_delete: self.editor.can_delete(),
                can_undo: self.editor.can_undo(),
                has_data: !self.editor.store().is_empty(),
                sliders_open: self.sliders_open,
                file_name,
            };
            actions.extend(render_toolbar(ui, &toolbar_ctx));
        });

        if self.sliders_open {
            egui::TopBottomPanel::top("peak_parameters").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(params) = sliders::render_peak_sliders(
                        ui,
                        &mut self.sliders,
                        &self.config.detection.sliders,
                    ) {
                        actions.push(AppAction::ParamsChanged(params));
                    }
                    if ui.button("Detect Now").clicked() {
                        actions.push(AppAction::DetectNow);
                    }
                });
            });
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let selection_message = self.editor.selection_message();
            let status_ctx = StatusBarContext {
                selection_message: selection_message.as_deref(),
                sample_count: self.editor.store().len(),
                peak_count: self.editor.annotations().peaks().len(),
                marker_count: self.editor.annotations().custom_markers().len(),
                detection_pending: self.editor.detection_pending(),
                last_error: self.last_error.as_deref(),
            };
            render_status_bar(ui, &status_ctx);
        });

        if std::mem::take(&mut self.scene_dirty) {
            self.scene = self.editor.scene();
        }

        let interaction = egui::CentralPanel::default()
            .show(ctx, |ui| {
                self.plot_view.render(ui, &self.scene, self.editor.store())
            })
            .inner;

        match interaction.hover_x {
            Some(x) => self.dispatch(InputEvent::Hover(x)),
            None if self.editor.hover_x().is_some() => self.dispatch(InputEvent::Unhover),
            None => {}
        }
        if let Some(index) = interaction.clicked_index {
            self.dispatch(InputEvent::PointClicked(index));
        }

        for action in actions {
            match action {
                AppAction::SetDarkMode(dark) => {
                    ctx.set_visuals(if dark {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    });
                    self.handle_action(AppAction::SetDarkMode(dark));
                }
                AppAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                other => self.handle_action(other),
            }
        }

        if self.scene_dirty {
            ctx.request_repaint();
        }
        self.schedule_detection_repaint(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.detection.shutdown();

        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save settings: {}", e);
        }
    }
}

//! Status bar panel: bottom bar showing selection, overlay counts and errors.

use egui::{Color32, RichText, Ui};

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub selection_message: Option<&'a str>,
    pub sample_count: usize,
    pub peak_count: usize,
    pub marker_count: usize,
    pub detection_pending: bool,
    pub last_error: Option<&'a str>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label(RichText::new(format!("Samples: {}", ctx.sample_count)).small());
        ui.separator();
        ui.label(RichText::new(format!("Peaks: {}", ctx.peak_count)).small());
        ui.separator();
        ui.label(RichText::new(format!("Markers: {}", ctx.marker_count)).small());

        if ctx.detection_pending {
            ui.separator();
            ui.colored_label(Color32::YELLOW, RichText::new("Detecting…").small());
        }

        if let Some(message) = ctx.selection_message {
            ui.separator();
            ui.label(RichText::new(message).small());
        }

        // === Error message (right-aligned) ===
        if let Some(error) = ctx.last_error {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(Color32::RED, RichText::new(error).small());
            });
        }
    });
}

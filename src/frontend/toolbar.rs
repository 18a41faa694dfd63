//! Toolbar panel: edit and detection buttons.
//!
//! Sits between the menu bar and the plot.

use egui::{Color32, RichText, Ui};

use crate::frontend::state::AppAction;

/// Context needed to render the toolbar.
pub struct ToolbarContext<'a> {
    pub can_delete: bool,
    pub can_undo: bool,
    pub has_data: bool,
    pub sliders_open: bool,
    pub file_name: Option<&'a str>,
}

/// Render the main application toolbar.
///
/// Returns actions to be applied by the app.
pub fn render_toolbar(ui: &mut Ui, ctx: &ToolbarContext<'_>) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        if ui
            .add_enabled(ctx.can_delete, egui::Button::new("Delete"))
            .on_hover_text("Delete the samples between the two selected points")
            .on_disabled_hover_text("Select two points first")
            .clicked()
        {
            actions.push(AppAction::DeleteSelection);
        }

        if ui
            .add_enabled(ctx.can_undo, egui::Button::new("Undo"))
            .on_hover_text("Restore the data before the last delete")
            .clicked()
        {
            actions.push(AppAction::Undo);
        }

        ui.separator();

        let peaks_label = if ctx.sliders_open {
            RichText::new("Find Peaks").color(Color32::from_rgb(128, 0, 128))
        } else {
            RichText::new("Find Peaks")
        };
        if ui
            .add_enabled(ctx.has_data, egui::Button::new(peaks_label).selected(ctx.sliders_open))
            .on_hover_text("Show the peak detection parameters")
            .clicked()
        {
            actions.push(AppAction::ToggleSliders);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            match ctx.file_name {
                Some(name) => ui.label(RichText::new(name).small()),
                None => ui.label(RichText::new("No file loaded").small().weak()),
            };
        });
    });

    actions
}

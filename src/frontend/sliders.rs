//! Peak detection parameter panel
//!
//! Each parameter has an enable checkbox and a slider. Disabled parameters
//! are sent as `None`, so they do not constrain detection.

use egui::Ui;

use crate::config::{SliderRange, SliderRanges};
use crate::types::PeakParams;

/// Editable state of the parameter sliders
#[derive(Debug, Clone, PartialEq)]
pub struct PeakSliderState {
    enabled: [bool; 4],
    values: [f64; 4],
}

impl PeakSliderState {
    /// Start from `defaults`; unset options begin disabled at their range minimum
    pub fn new(defaults: &PeakParams, ranges: &SliderRanges) -> Self {
        let mut enabled = [false; 4];
        let mut values = [0.0; 4];
        for (i, name) in PeakParams::OPTION_NAMES.iter().enumerate() {
            let range = ranges.get(name).copied().unwrap_or(SliderRange::new(0.0, 1.0, 0.1));
            match defaults.get(name) {
                Some(v) => {
                    enabled[i] = true;
                    values[i] = range.clamp(v);
                }
                None => values[i] = range.min,
            }
        }
        Self { enabled, values }
    }

    /// Parameters as currently shown
    pub fn params(&self) -> PeakParams {
        let mut params = PeakParams::default();
        for (i, name) in PeakParams::OPTION_NAMES.iter().enumerate() {
            params.set(name, self.enabled[i].then_some(self.values[i]));
        }
        params
    }

    /// Enable an option and set its value
    pub fn set(&mut self, name: &str, value: f64) {
        if let Some(i) = PeakParams::OPTION_NAMES.iter().position(|n| *n == name) {
            self.enabled[i] = true;
            self.values[i] = value;
        }
    }

    /// Disable an option
    pub fn disable(&mut self, name: &str) {
        if let Some(i) = PeakParams::OPTION_NAMES.iter().position(|n| *n == name) {
            self.enabled[i] = false;
        }
    }
}

/// Render the parameter panel; returns the new parameters when anything changed
pub fn render_peak_sliders(
    ui: &mut Ui,
    state: &mut PeakSliderState,
    ranges: &SliderRanges,
) -> Option<PeakParams> {
    let mut changed = false;

    egui::Grid::new("peak_sliders")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            for (i, name) in PeakParams::OPTION_NAMES.iter().enumerate() {
                let Some(range) = ranges.get(name) else {
                    continue;
                };
                changed |= ui.checkbox(&mut state.enabled[i], *name).changed();
                let slider = egui::Slider::new(&mut state.values[i], range.min..=range.max)
                    .step_by(range.step);
                changed |= ui.add_enabled(state.enabled[i], slider).changed();
                ui.end_row();
            }
        });

    changed.then(|| state.params())
}

//! Plot rendering module using egui_plot
//!
//! Draws a [`Scene`] and translates pointer input back into editor terms:
//! clicks near a sample become a sample index, hovering becomes an x
//! position on the time axis.
//!
//! # Main Types
//!
//! - [`PlotView`] - Plot configuration and per-frame rendering
//! - [`PlotInteraction`] - Pointer results for one frame

use egui::{Pos2, Ui};
use egui_plot::{Corner, Legend, Line, Plot, PlotPoint, PlotPoints, PlotTransform, Points};

use crate::editor::{Scene, TimeSeriesStore};
use crate::frontend::markers::{legend_name, to_color32};

/// Maximum screen distance in points between a click and the sample it selects
pub const CLICK_RADIUS: f32 = 12.0;

/// Radius of the highlight drawn on selected samples
const SELECTED_POINT_RADIUS: f32 = 5.0;

/// Pointer results for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlotInteraction {
    /// Sample index under a click, if any
    pub clicked_index: Option<usize>,
    /// Time-axis position under the pointer; `None` when off the plot
    pub hover_x: Option<f64>,
}

/// Plot view configuration and state
#[derive(Debug, Clone)]
pub struct PlotView {
    /// Whether to show the legend
    pub show_legend: bool,
    /// Whether to show grid lines
    pub show_grid: bool,
    /// Reset zoom and pan on the next frame
    reset_requested: bool,
}

impl Default for PlotView {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_grid: true,
            reset_requested: false,
        }
    }
}

impl PlotView {
    /// Fit the view to the data on the next frame
    pub fn reset_view(&mut self) {
        self.reset_requested = true;
    }

    /// Render the scene and report pointer interaction
    pub fn render(&mut self, ui: &mut Ui, scene: &Scene, store: &TimeSeriesStore) -> PlotInteraction {
        let mut plot = Plot::new("signal_plot")
            .allow_double_click_reset(true)
            .show_axes(true)
            .show_grid(self.show_grid)
            .x_axis_label("Elapsed Time")
            .y_axis_label("Value");

        if self.show_legend {
            plot = plot.legend(
                Legend::default()
                    .position(Corner::RightTop)
                    .background_alpha(0.8),
            );
        }

        if std::mem::take(&mut self.reset_requested) {
            plot = plot.reset();
        }

        let response = plot.show(ui, |plot_ui| {
            for trace in [&scene.primary, &scene.reference] {
                if trace.points.is_empty() {
                    continue;
                }
                let line = Line::new(trace.name, PlotPoints::from(trace.points.clone()))
                    .color(to_color32(trace.color))
                    .width(trace.width);
                plot_ui.line(line);
            }

            for marker in &scene.markers {
                let segment = vec![[marker.x, marker.y_min], [marker.x, marker.y_max]];
                let line = Line::new(legend_name(&marker.kind), PlotPoints::from(segment))
                    .color(to_color32(marker.color))
                    .width(marker.width);
                plot_ui.line(line);
            }

            if !scene.selected_points.is_empty() {
                let points = Points::new("Selected", PlotPoints::from(scene.selected_points.clone()))
                    .radius(SELECTED_POINT_RADIUS)
                    .color(to_color32(scene.selection_color));
                plot_ui.points(points);
            }
        });

        let transform = &response.transform;
        let hover_x = response
            .response
            .hover_pos()
            .map(|pos| transform.value_from_position(pos).x);

        let clicked_index = if response.response.clicked() {
            response
                .response
                .interact_pointer_pos()
                .and_then(|pos| pick_sample(transform, store, pos))
        } else {
            None
        };

        PlotInteraction {
            clicked_index,
            hover_x,
        }
    }
}

/// Nearest sample to a screen position, if within [`CLICK_RADIUS`] of either trace
fn pick_sample(transform: &PlotTransform, store: &TimeSeriesStore, pos: Pos2) -> Option<usize> {
    let x = transform.value_from_position(pos).x;
    let index = store.nearest_index(x)?;
    let sample = store.sample(index)?;

    let within = |value: f64| {
        if !value.is_finite() {
            return false;
        }
        let screen = transform.position_from_point(&PlotPoint::new(sample.time, value));
        screen.distance(pos) <= CLICK_RADIUS
    };

    (within(sample.primary) || within(sample.reference)).then_some(index)
}

//! Pure transform from editor state to a renderable scene
//!
//! The scene is a flat description of what to draw: two signal traces and
//! a list of vertical overlay markers. It carries no rendering-library
//! types, so any charting backend can consume it.
//!
//! Building is deterministic. Markers are ordered selection first (in
//! selection order), then peaks (in response order), then custom markers
//! (in insertion order).

use super::annotations::{AnnotationSet, MarkerCategory};
use super::selection::SelectionModel;
use super::store::TimeSeriesStore;
use crate::types::Rgb;
use serde::{Deserialize, Serialize};

/// Colours and widths used when building a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneStyle {
    pub primary_color: Rgb,
    pub reference_color: Rgb,
    pub selection_color: Rgb,
    pub peak_color: Rgb,
    pub line_width: f32,
    pub marker_width: f32,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            primary_color: Rgb::GREEN,
            reference_color: Rgb::BLUE,
            selection_color: Rgb::RED,
            peak_color: Rgb::PURPLE,
            line_width: 1.5,
            marker_width: 1.0,
        }
    }
}

/// A polyline for one signal channel
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: &'static str,
    pub points: Vec<[f64; 2]>,
    pub color: Rgb,
    pub width: f32,
}

/// What an overlay marker represents
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayKind {
    Selection { index: usize },
    Peak { index: usize },
    Custom { category: MarkerCategory },
}

/// A dashed vertical line spanning both signals' combined extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMarker {
    pub x: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub color: Rgb,
    pub width: f32,
    pub kind: OverlayKind,
}

/// Complete renderable description of the editor state
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub primary: Trace,
    pub reference: Trace,
    /// Highlighted points on the primary trace for selected samples
    pub selected_points: Vec<[f64; 2]>,
    /// Colour of the selected-point highlight
    pub selection_color: Rgb,
    pub markers: Vec<VerticalMarker>,
    /// Combined (min, max) of both signals, if there is data
    pub y_extent: Option<(f64, f64)>,
}

impl Scene {
    /// Markers of one kind, preserving order
    pub fn markers_where<'a>(
        &'a self,
        pred: impl Fn(&OverlayKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a VerticalMarker> + 'a {
        self.markers.iter().filter(move |m| pred(&m.kind))
    }

    pub fn is_empty(&self) -> bool {
        self.primary.points.is_empty()
    }
}

/// Builds [`Scene`]s from editor state
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    style: SceneStyle,
}

impl SceneBuilder {
    pub fn new(style: SceneStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    pub fn build(
        &self,
        store: &TimeSeriesStore,
        selection: &SelectionModel,
        annotations: &AnnotationSet,
    ) -> Scene {
        let style = &self.style;
        let time = store.time();
        let y_extent = store.value_range();
        let (y_min, y_max) = y_extent.unwrap_or((0.0, 0.0));

        let trace = |name, values: &[f64], color| Trace {
            name,
            points: time.iter().zip(values).map(|(&t, &v)| [t, v]).collect(),
            color,
            width: style.line_width,
        };
        let marker = |x, color, kind| VerticalMarker {
            x,
            y_min,
            y_max,
            color,
            width: style.marker_width,
            kind,
        };

        let mut markers = Vec::with_capacity(
            selection.len() + annotations.peaks().len() + annotations.custom_markers().len(),
        );
        let mut selected_points = Vec::with_capacity(selection.len());

        for &index in selection.selected() {
            if let Some(sample) = store.sample(index) {
                selected_points.push([sample.time, sample.primary]);
                markers.push(marker(
                    sample.time,
                    style.selection_color,
                    OverlayKind::Selection { index },
                ));
            }
        }

        // Peaks may be stale after a delete; out-of-range ones are skipped
        for &index in annotations.peaks() {
            if let Some(&x) = time.get(index) {
                markers.push(marker(x, style.peak_color, OverlayKind::Peak { index }));
            }
        }

        for custom in annotations.custom_markers() {
            markers.push(marker(
                custom.x,
                custom.color(),
                OverlayKind::Custom {
                    category: custom.category,
                },
            ));
        }

        Scene {
            primary: trace("Primary", store.primary(), style.primary_color),
            reference: trace("Reference", store.reference(), style.reference_color),
            selected_points,
            selection_color: style.selection_color,
            markers,
            y_extent,
        }
    }
}

//! Interactive editing and annotation core
//!
//! [`Editor`] owns every piece of mutable session state (the time-series
//! buffer, point selection, undo snapshot, overlays and hover position) and
//! is the single entry point for operator input. It has no knowledge of
//! egui, channels or files: collaborators feed it [`InputEvent`]s and
//! detection responses, and read back a [`Scene`].
//!
//! # Components
//!
//! - [`TimeSeriesStore`] - Index-aligned time, primary and reference channels
//! - [`SelectionModel`] - Up to two selected sample indices, FIFO eviction
//! - [`EditHistory`] - Single-slot snapshot taken before each delete
//! - [`AnnotationSet`] - Detected peaks and categorized custom markers
//! - [`RecomputeCoordinator`] - Debounced detection requests with a latest-wins gate
//! - [`SceneBuilder`] - Pure state-to-scene transform
//!
//! # Example
//!
//! ```
//! use sigedit_rs::editor::{Editor, InputEvent};
//! use sigedit_rs::types::ChannelTable;
//! use std::time::Instant;
//!
//! let mut editor = Editor::default();
//! editor
//!     .load(ChannelTable::from_channels(
//!         vec![0.0, 1.0, 2.0, 3.0, 4.0],
//!         vec![1.0, 3.0, 2.0, 5.0, 1.0],
//!         vec![0.0; 5],
//!     ))
//!     .unwrap();
//!
//! let now = Instant::now();
//! editor.handle(InputEvent::PointClicked(1), now).unwrap();
//! editor.handle(InputEvent::PointClicked(3), now).unwrap();
//! editor.handle(InputEvent::DeleteSelection, now).unwrap();
//! assert_eq!(editor.store().len(), 2);
//!
//! editor.handle(InputEvent::Undo, now).unwrap();
//! assert_eq!(editor.store().len(), 5);
//! ```

pub mod annotations;
pub mod history;
pub mod recompute;
pub mod scene;
pub mod selection;
pub mod store;

pub use annotations::{AnnotationSet, CustomMarker, MarkerCategory};
pub use history::EditHistory;
pub use recompute::{
    DetectionOutcome, DetectionRequest, DetectionResponse, RecomputeCoordinator, RecomputeState,
    ResponseDisposition, DEFAULT_DEBOUNCE,
};
pub use scene::{OverlayKind, Scene, SceneBuilder, SceneStyle, Trace, VerticalMarker};
pub use selection::{SelectionModel, MAX_SELECTED};
pub use store::TimeSeriesStore;

use crate::error::EditorError;
use crate::types::{ChannelTable, PeakParams, Sample};
use std::time::{Duration, Instant};

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Escape,
    Backspace,
    Char(char),
}

/// Discrete operator input delivered to the editor
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A sample on the primary trace was clicked
    PointClicked(usize),
    /// Pointer is over the plot at this x position
    Hover(f64),
    /// Pointer left the plot
    Unhover,
    Key(EditorKey),
    /// Delete the closed interval between the two selected points
    DeleteSelection,
    Undo,
    /// A detection slider moved
    ParamsChanged(PeakParams),
    /// Run detection now, bypassing the debounce
    DetectNow,
}

/// Effect of handling an input event
#[derive(Debug, Clone, PartialEq)]
pub enum EditorOutcome {
    /// State changed; the scene should be rebuilt
    Redraw,
    /// Nothing observable changed
    NoChange,
    /// A detection request should be sent to the detection service
    Detect(DetectionRequest),
}

/// Construction options for [`Editor`]
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub debounce: Duration,
    pub style: SceneStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            style: SceneStyle::default(),
        }
    }
}

/// Owned editing session state
#[derive(Debug, Clone)]
pub struct Editor {
    store: TimeSeriesStore,
    selection: SelectionModel,
    history: EditHistory,
    annotations: AnnotationSet,
    recompute: RecomputeCoordinator,
    scene_builder: SceneBuilder,
    hover_x: Option<f64>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: TimeSeriesStore::new(),
            selection: SelectionModel::new(),
            history: EditHistory::new(),
            annotations: AnnotationSet::new(),
            recompute: RecomputeCoordinator::new(config.debounce),
            scene_builder: SceneBuilder::new(config.style),
            hover_x: None,
        }
    }

    /// Start a new session from an ingested table
    ///
    /// On a schema error every piece of state is left as it was.
    pub fn load(&mut self, table: ChannelTable) -> Result<(), EditorError> {
        let mut store = TimeSeriesStore::new();
        store.load(table)?;

        self.store = store;
        self.selection.clear();
        self.history.clear();
        self.annotations.clear();
        self.recompute.reset();
        self.hover_x = None;
        Ok(())
    }

    /// Dispatch one input event
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Result<EditorOutcome, EditorError> {
        let outcome = match event {
            InputEvent::PointClicked(index) => {
                self.toggle_point(index)?;
                EditorOutcome::Redraw
            }
            InputEvent::Hover(x) => {
                self.hover_x = Some(x);
                EditorOutcome::NoChange
            }
            InputEvent::Unhover => {
                self.hover_x = None;
                EditorOutcome::NoChange
            }
            InputEvent::Key(EditorKey::Escape | EditorKey::Backspace) => {
                redraw_if(self.selection.pop_most_recent().is_some())
            }
            InputEvent::Key(EditorKey::Char(c @ '0'..='3')) => {
                let mut buf = [0u8; 4];
                redraw_if(self.add_marker_at_hover(c.encode_utf8(&mut buf))?.is_some())
            }
            InputEvent::Key(EditorKey::Char(_)) => EditorOutcome::NoChange,
            InputEvent::DeleteSelection => redraw_if(self.delete_selection()?.is_some()),
            InputEvent::Undo => {
                self.undo()?;
                EditorOutcome::Redraw
            }
            InputEvent::ParamsChanged(params) => {
                self.recompute.on_parameter_change(params, now);
                EditorOutcome::NoChange
            }
            InputEvent::DetectNow => match self.request_detection_now() {
                Some(request) => EditorOutcome::Detect(request),
                None => EditorOutcome::NoChange,
            },
        };
        Ok(outcome)
    }

    /// Toggle selection of a sample, rejecting indices outside the store
    pub fn toggle_point(&mut self, index: usize) -> Result<&[usize], EditorError> {
        if !self.store.contains_index(index) {
            return Err(EditorError::IndexOutOfRange {
                start: index,
                end: index,
                len: self.store.len(),
            });
        }
        Ok(self.selection.toggle(index))
    }

    pub fn pop_selection(&mut self) -> Option<usize> {
        self.selection.pop_most_recent()
    }

    pub fn set_hover(&mut self, x: Option<f64>) {
        self.hover_x = x;
    }

    /// Append a custom marker at the hover position
    ///
    /// Returns `Ok(None)` when the pointer is not over the plot.
    pub fn add_marker_at_hover(&mut self, key: &str) -> Result<Option<CustomMarker>, EditorError> {
        let Some(x) = self.hover_x else {
            return Ok(None);
        };
        let marker = self.annotations.add_custom_marker(x, key)?;
        tracing::debug!(x, key, "Added custom marker");
        Ok(Some(marker))
    }

    /// Delete the interval spanned by the two selected points
    ///
    /// Returns the deleted `(start, end)` or `None` when fewer than two
    /// points are selected.
    pub fn delete_selection(&mut self) -> Result<Option<(usize, usize)>, EditorError> {
        let Some((start, end)) = self.selection.range() else {
            return Ok(None);
        };
        if end >= self.store.len() {
            return Err(EditorError::IndexOutOfRange {
                start,
                end,
                len: self.store.len(),
            });
        }
        self.history.capture(&self.store);
        self.store.delete_range(start, end)?;
        self.selection.clear();
        Ok(Some((start, end)))
    }

    /// Restore the store to its state before the last delete
    pub fn undo(&mut self) -> Result<(), EditorError> {
        let snapshot = self.history.consume()?;
        self.store.restore(snapshot);
        self.selection.clear();
        tracing::info!(samples = self.store.len(), "Undid last delete");
        Ok(())
    }

    /// Record new detection parameters; the request fires after the debounce
    pub fn set_params(&mut self, params: PeakParams, now: Instant) {
        self.recompute.on_parameter_change(params, now);
    }

    /// Issue the debounced detection request if it is due
    pub fn poll(&mut self, now: Instant) -> Option<DetectionRequest> {
        let request = self.recompute.poll(now, &self.store)?;
        if self.store.is_empty() {
            tracing::debug!("Skipping peak detection on empty store");
            self.recompute.abandon(request.seq);
            return None;
        }
        Some(request)
    }

    /// Issue a detection request immediately
    pub fn request_detection_now(&mut self) -> Option<DetectionRequest> {
        if self.store.is_empty() {
            return None;
        }
        Some(self.recompute.request_now(&self.store))
    }

    /// Deliver a detection response through the latest-wins gate
    pub fn apply_detection(&mut self, response: DetectionResponse) -> ResponseDisposition {
        self.recompute.accept(response, &mut self.annotations)
    }

    /// Drop the outstanding flag for a request the service never received
    pub fn abandon_detection(&mut self, seq: u64) {
        self.recompute.abandon(seq);
    }

    /// Whether detection is scheduled or a reply is still outstanding
    pub fn detection_pending(&self) -> bool {
        self.recompute.is_scheduled() || self.recompute.awaiting_response()
    }

    /// Build the renderable scene for the current state
    pub fn scene(&self) -> Scene {
        self.scene_builder
            .build(&self.store, &self.selection, &self.annotations)
    }

    /// Operator-facing description of the selected points
    pub fn selection_message(&self) -> Option<String> {
        if self.selection.is_empty() {
            return None;
        }
        let points: Vec<String> = self
            .selected_samples()
            .map(|s| format!("({}, {})", s.time, s.primary))
            .collect();
        Some(format!("You have selected point(s): {}", points.join(" and ")))
    }

    pub fn selected_samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.selection
            .selected()
            .iter()
            .filter_map(|&i| self.store.sample(i))
    }

    pub fn can_delete(&self) -> bool {
        self.selection.range().is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn store(&self) -> &TimeSeriesStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn recompute(&self) -> &RecomputeCoordinator {
        &self.recompute
    }

    pub fn hover_x(&self) -> Option<f64> {
        self.hover_x
    }

    /// When the next debounced request is due, for repaint scheduling
    pub fn next_deadline(&self) -> Option<Instant> {
        self.recompute.next_deadline()
    }
}

fn redraw_if(changed: bool) -> EditorOutcome {
    if changed {
        EditorOutcome::Redraw
    } else {
        EditorOutcome::NoChange
    }
}

//! Debounced peak-detection scheduling with a latest-wins gate
//!
//! The coordinator is a two-state machine, `Idle` and `Scheduled`. Each
//! parameter change (re)arms a single trailing deadline; when the deadline
//! passes, [`RecomputeCoordinator::poll`] issues exactly one request stamped
//! with a fresh sequence number. Responses are applied only when their
//! sequence number is the highest issued so far, so a slow reply to an old
//! request can never overwrite a newer overlay.
//!
//! The coordinator also remembers whether the latest request is still
//! awaiting its reply, so the frontend can keep repainting until it lands.
//!
//! Time is passed in explicitly rather than read from a clock, which keeps
//! the state machine deterministic under test.

use super::annotations::AnnotationSet;
use super::store::TimeSeriesStore;
use crate::types::PeakParams;
use std::time::{Duration, Instant};

/// Default trailing delay between the last parameter change and the request
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A request to the detection collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRequest {
    /// Monotonic sequence number
    pub seq: u64,
    /// Store contents at the time of issue
    pub table: TimeSeriesStore,
    pub params: PeakParams,
}

/// Result reported by the detection collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    Success(Vec<usize>),
    Failure(String),
}

/// A detection reply tagged with the sequence number of its request
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResponse {
    pub seq: u64,
    pub outcome: DetectionOutcome,
}

/// What happened to a delivered response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseDisposition {
    /// Peaks were replaced
    Applied { peak_count: usize },
    /// Superseded by a newer request and ignored
    Stale,
    /// Current request failed; existing peaks are kept
    Failed(String),
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeState {
    Idle,
    Scheduled { deadline: Instant },
}

/// Coalesces parameter changes into single trailing detection requests
#[derive(Debug, Clone)]
pub struct RecomputeCoordinator {
    delay: Duration,
    state: RecomputeState,
    params: PeakParams,
    latest_issued: u64,
    /// Sequence number of the latest request while its reply is outstanding
    awaiting: Option<u64>,
}

impl Default for RecomputeCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl RecomputeCoordinator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: RecomputeState::Idle,
            params: PeakParams::default(),
            latest_issued: 0,
            awaiting: None,
        }
    }

    /// Record new parameters and rearm the trailing deadline
    pub fn on_parameter_change(&mut self, params: PeakParams, now: Instant) {
        self.params = params;
        let deadline = now + self.delay;
        if let RecomputeState::Scheduled { .. } = self.state {
            tracing::debug!("Rescheduling pending peak detection");
        }
        self.state = RecomputeState::Scheduled { deadline };
    }

    /// Issue the pending request once its deadline has passed
    pub fn poll(&mut self, now: Instant, store: &TimeSeriesStore) -> Option<DetectionRequest> {
        match self.state {
            RecomputeState::Scheduled { deadline } if now >= deadline => Some(self.issue(store)),
            _ => None,
        }
    }

    /// Issue a request immediately, dropping any pending schedule
    pub fn request_now(&mut self, store: &TimeSeriesStore) -> DetectionRequest {
        self.issue(store)
    }

    fn issue(&mut self, store: &TimeSeriesStore) -> DetectionRequest {
        self.state = RecomputeState::Idle;
        self.latest_issued += 1;
        self.awaiting = Some(self.latest_issued);
        tracing::debug!(seq = self.latest_issued, "Issuing peak detection request");
        DetectionRequest {
            seq: self.latest_issued,
            table: store.clone(),
            params: self.params,
        }
    }

    /// Gate a response and apply it to the annotations when current
    pub fn accept(
        &mut self,
        response: DetectionResponse,
        annotations: &mut AnnotationSet,
    ) -> ResponseDisposition {
        if response.seq != self.latest_issued {
            tracing::debug!(
                seq = response.seq,
                latest = self.latest_issued,
                "Discarding stale detection response"
            );
            return ResponseDisposition::Stale;
        }
        self.awaiting = None;
        match response.outcome {
            DetectionOutcome::Success(peaks) => {
                let peak_count = peaks.len();
                annotations.replace_peaks(peaks);
                ResponseDisposition::Applied { peak_count }
            }
            DetectionOutcome::Failure(message) => {
                tracing::warn!(seq = response.seq, "Peak detection failed: {}", message);
                ResponseDisposition::Failed(message)
            }
        }
    }

    /// Cancel any pending schedule and orphan in-flight requests
    pub fn reset(&mut self) {
        self.state = RecomputeState::Idle;
        self.awaiting = None;
        // Burn a sequence number so every outstanding reply reads as stale
        self.latest_issued += 1;
    }

    /// Forget an issued request that never reached the detection service
    pub fn abandon(&mut self, seq: u64) {
        if self.awaiting == Some(seq) {
            tracing::debug!(seq, "Abandoning undelivered detection request");
            self.awaiting = None;
        }
    }

    /// Whether the latest request is still waiting for its reply
    pub fn awaiting_response(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn state(&self) -> RecomputeState {
        self.state
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, RecomputeState::Scheduled { .. })
    }

    /// When the pending request is due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            RecomputeState::Scheduled { deadline } => Some(deadline),
            RecomputeState::Idle => None,
        }
    }

    pub fn params(&self) -> &PeakParams {
        &self.params
    }

    pub fn latest_issued(&self) -> u64 {
        self.latest_issued
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

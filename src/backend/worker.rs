//! Detection Worker Thread Implementation
//!
//! This module contains the worker loop that runs peak detection on a
//! separate thread so slider drags never stall the UI. It communicates with
//! the UI thread through crossbeam channels.
//!
//! # Responsibilities
//!
//! - **Command processing**: Runs each [`DetectionCommand::Detect`] it receives
//! - **Result reporting**: Replies with a [`DetectionResponse`] tagged with the
//!   request's sequence number, success or failure
//! - **Statistics tracking**: Records run counts and timing
//!
//! The worker never decides whether a result is stale. It answers every
//! request; the editor's sequence gate discards superseded replies.

use crate::backend::detector::{DetectorStats, PeakDetector};
use crate::backend::{DetectionCommand, DetectionMessage};
use crate::editor::{DetectionOutcome, DetectionRequest, DetectionResponse};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long to block waiting for a command before re-checking the running flag
const IDLE_WAIT: Duration = Duration::from_millis(100);

/// The worker that services detection requests
pub struct DetectionWorker {
    /// Command receiver from the UI
    command_rx: Receiver<DetectionCommand>,
    /// Message sender to the UI
    message_tx: Sender<DetectionMessage>,
    /// Running flag
    running: Arc<AtomicBool>,
    /// Detector implementation
    detector: Box<dyn PeakDetector>,
    /// Statistics
    stats: DetectorStats,
}

impl DetectionWorker {
    /// Create a new detection worker
    pub fn new(
        detector: Box<dyn PeakDetector>,
        command_rx: Receiver<DetectionCommand>,
        message_tx: Sender<DetectionMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            command_rx,
            message_tx,
            running,
            detector,
            stats: DetectorStats::default(),
        }
    }

    /// Run the worker loop until shutdown or the UI hangs up
    pub fn run(&mut self) {
        tracing::info!(detector = self.detector.name(), "Detection worker started");

        while self.running.load(Ordering::SeqCst) {
            match self.command_rx.recv_timeout(IDLE_WAIT) {
                Ok(cmd) => self.handle_command(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.running.store(false, Ordering::SeqCst);
                }
            }
        }

        let _ = self.message_tx.send(DetectionMessage::Shutdown);
        tracing::info!(
            runs = self.stats.successful_runs,
            failures = self.stats.failed_runs,
            avg_us = self.stats.avg_run_time_us(),
            "Detection worker stopped"
        );
    }

    fn handle_command(&mut self, cmd: DetectionCommand) {
        match cmd {
            DetectionCommand::Detect(request) => {
                let response = self.process(request);
                if self.message_tx.send(DetectionMessage::Result(response)).is_err() {
                    self.running.store(false, Ordering::SeqCst);
                }
            }
            DetectionCommand::Shutdown => {
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }

    /// Run one request through the detector
    pub fn process(&mut self, request: DetectionRequest) -> DetectionResponse {
        let start = Instant::now();
        let outcome = match self.detector.detect(&request.table, &request.params) {
            Ok(peaks) => {
                let elapsed_us = start.elapsed().as_micros() as u64;
                self.stats.record_success(elapsed_us);
                tracing::debug!(
                    seq = request.seq,
                    peaks = peaks.len(),
                    elapsed_us,
                    "Detection complete"
                );
                DetectionOutcome::Success(peaks)
            }
            Err(e) => {
                self.stats.record_failure();
                tracing::warn!(seq = request.seq, "Detection failed: {}", e);
                DetectionOutcome::Failure(e.to_string())
            }
        };
        DetectionResponse {
            seq: request.seq,
            outcome,
        }
    }

    pub fn stats(&self) -> &DetectorStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::detector::MockPeakDetector;
    use crate::editor::TimeSeriesStore;
    use crate::error::SigEditError;
    use crate::types::PeakParams;
    use crossbeam_channel::unbounded;

    fn request(seq: u64) -> DetectionRequest {
        DetectionRequest {
            seq,
            table: TimeSeriesStore::from_channels(vec![0.0, 1.0], vec![1.0, 2.0], vec![0.0, 0.0])
                .unwrap(),
            params: PeakParams::default(),
        }
    }

    fn worker_with(mock: MockPeakDetector) -> DetectionWorker {
        let (_cmd_tx, cmd_rx) = unbounded();
        let (msg_tx, _msg_rx) = unbounded();
        DetectionWorker::new(Box::new(mock), cmd_rx, msg_tx, Arc::new(AtomicBool::new(true)))
    }

    #[test]
    fn test_process_success_keeps_sequence() {
        let mut mock = MockPeakDetector::new();
        mock.expect_detect()
            .times(1)
            .returning(|_, _| Ok(vec![4, 8]));

        let mut worker = worker_with(mock);
        let response = worker.process(request(7));

        assert_eq!(response.seq, 7);
        assert_eq!(response.outcome, DetectionOutcome::Success(vec![4, 8]));
        assert_eq!(worker.stats().successful_runs, 1);
    }

    #[test]
    fn test_process_failure_becomes_failure_outcome() {
        let mut mock = MockPeakDetector::new();
        mock.expect_detect()
            .returning(|_, _| Err(SigEditError::Detection("bad params".to_string())));

        let mut worker = worker_with(mock);
        let response = worker.process(request(2));

        assert!(matches!(response.outcome, DetectionOutcome::Failure(ref m) if m.contains("bad params")));
        assert_eq!(worker.stats().failed_runs, 1);
    }

    #[test]
    fn test_run_answers_then_stops_on_shutdown() {
        let mut mock = MockPeakDetector::new();
        mock.expect_name().return_const("mock");
        mock.expect_detect().times(2).returning(|_, _| Ok(vec![1]));

        let (cmd_tx, cmd_rx) = unbounded();
        let (msg_tx, msg_rx) = unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let mut worker = DetectionWorker::new(Box::new(mock), cmd_rx, msg_tx, running.clone());

        cmd_tx.send(DetectionCommand::Detect(request(1))).unwrap();
        cmd_tx.send(DetectionCommand::Detect(request(2))).unwrap();
        cmd_tx.send(DetectionCommand::Shutdown).unwrap();
        worker.run();

        let messages: Vec<_> = msg_rx.try_iter().collect();
        assert_eq!(messages.len(), 3);
        assert!(matches!(&messages[0], DetectionMessage::Result(r) if r.seq == 1));
        assert!(matches!(&messages[1], DetectionMessage::Result(r) if r.seq == 2));
        assert!(matches!(messages[2], DetectionMessage::Shutdown));
        assert!(!running.load(Ordering::SeqCst));
    }
}

//! Backend module for the peak detection service
//!
//! Peak detection runs in a separate thread to keep the UI responsive. It
//! uses crossbeam channels for thread-safe communication with the frontend.
//!
//! # Architecture
//!
//! - [`DetectionCommand`] - Messages sent from UI to the detection worker
//! - [`DetectionMessage`] - Messages sent from the worker back to the UI
//! - [`DetectionBridge`] - UI-side handle for submitting requests and draining replies
//! - [`DetectionBackend`] - Entry point that owns the worker's end of the channels
//!
//! # Components
//!
//! - [`PeakDetector`] - Detector trait, with [`ScipyStyleDetector`] as the default
//! - [`DetectionWorker`] - Worker loop that answers each request
//!
//! # Example
//!
//! ```ignore
//! use sigedit_rs::backend::{DetectionBackend, DetectionMessage, ScipyStyleDetector};
//!
//! let (backend, bridge) = DetectionBackend::new(Box::new(ScipyStyleDetector::new()));
//! std::thread::spawn(move || backend.run());
//!
//! if let Some(request) = editor.poll(Instant::now()) {
//!     bridge.submit(request);
//! }
//! for msg in bridge.drain() {
//!     if let DetectionMessage::Result(response) = msg {
//!         editor.apply_detection(response);
//!     }
//! }
//! ```

pub mod detector;
pub mod worker;

pub use detector::{DetectorStats, PeakDetector, ScipyStyleDetector};
pub use worker::DetectionWorker;

use crate::editor::{DetectionRequest, DetectionResponse};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Channel capacity for commands (UI → worker)
const CMD_CHANNEL_CAPACITY: usize = 64;
/// Channel capacity for messages (worker → UI)
const MSG_CHANNEL_CAPACITY: usize = 64;

/// Message sent from the UI to the detection worker
#[derive(Debug, Clone)]
pub enum DetectionCommand {
    /// Run detection for a request
    Detect(DetectionRequest),
    /// Shutdown the worker
    Shutdown,
}

/// Message sent from the detection worker to the UI
#[derive(Debug, Clone)]
pub enum DetectionMessage {
    /// Reply to a request, success or failure
    Result(DetectionResponse),
    /// Worker is shutting down
    Shutdown,
}

/// UI-side handle for the detection worker
pub struct DetectionBridge {
    /// Sender for commands to the worker
    pub command_sender: Sender<DetectionCommand>,
    /// Receiver for worker messages
    pub receiver: Receiver<DetectionMessage>,
}

impl DetectionBridge {
    /// Send a request without blocking
    ///
    /// Returns false when the worker is gone or the queue is full; the request
    /// then simply never answers and the previous peaks stay in place.
    pub fn submit(&self, request: DetectionRequest) -> bool {
        let seq = request.seq;
        match self.command_sender.try_send(DetectionCommand::Detect(request)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(seq, "Failed to submit detection request: {}", e);
                false
            }
        }
    }

    /// Try to receive a message without blocking
    pub fn try_recv(&self) -> Option<DetectionMessage> {
        self.receiver.try_recv().ok()
    }

    /// Receive all pending messages
    pub fn drain(&self) -> Vec<DetectionMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.receiver.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        let _ = self.command_sender.send(DetectionCommand::Shutdown);
    }
}

/// The detection service that runs in a separate thread
pub struct DetectionBackend {
    detector: Box<dyn PeakDetector>,
    command_receiver: Receiver<DetectionCommand>,
    message_sender: Sender<DetectionMessage>,
    running: Arc<AtomicBool>,
}

impl DetectionBackend {
    /// Create a new backend with communication channels
    pub fn new(detector: Box<dyn PeakDetector>) -> (Self, DetectionBridge) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = bounded(MSG_CHANNEL_CAPACITY);

        let backend = Self {
            detector,
            command_receiver: cmd_rx,
            message_sender: msg_tx,
            running: Arc::new(AtomicBool::new(true)),
        };

        let bridge = DetectionBridge {
            command_sender: cmd_tx,
            receiver: msg_rx,
        };

        (backend, bridge)
    }

    /// Run the worker loop on the current thread
    pub fn run(self) {
        let mut worker = DetectionWorker::new(
            self.detector,
            self.command_receiver,
            self.message_sender,
            self.running,
        );
        worker.run();
    }

    /// Spawn the worker on a named thread
    pub fn spawn(self) -> std::io::Result<std::thread::JoinHandle<()>> {
        std::thread::Builder::new()
            .name("peak-detection".to_string())
            .spawn(move || self.run())
    }

    /// Get a handle to stop the backend
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{DetectionOutcome, TimeSeriesStore};
    use crate::types::PeakParams;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    #[test]
    fn test_backend_creation() {
        let (backend, bridge) = DetectionBackend::new(Box::new(ScipyStyleDetector::new()));
        assert!(backend.running.load(Ordering::SeqCst));
        assert!(bridge.drain().is_empty());
    }

    #[test]
    fn test_round_trip_through_thread() {
        let (backend, bridge) = DetectionBackend::new(Box::new(ScipyStyleDetector::new()));
        let handle = backend.spawn().unwrap();

        let table = TimeSeriesStore::from_channels(
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![0.0, 5.0, 0.0, 2.0, 0.0],
            vec![0.0; 5],
        )
        .unwrap();
        assert!(bridge.submit(DetectionRequest {
            seq: 1,
            table,
            params: PeakParams::default(),
        }));

        let msg = bridge
            .receiver
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        match msg {
            DetectionMessage::Result(response) => {
                assert_eq!(response.seq, 1);
                assert_eq!(response.outcome, DetectionOutcome::Success(vec![1, 3]));
            }
            other => panic!("unexpected message: {:?}", other),
        }

        bridge.shutdown();
        handle.join().unwrap();
    }
}

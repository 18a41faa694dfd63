//! Single-level undo history

use super::store::TimeSeriesStore;
use crate::error::EditorError;

/// Holds at most one pre-edit snapshot of the store
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    snapshot: Option<TimeSeriesStore>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-copy the store, replacing any earlier snapshot
    pub fn capture(&mut self, store: &TimeSeriesStore) {
        self.snapshot = Some(store.clone());
    }

    /// Take the snapshot, leaving the history empty
    pub fn consume(&mut self) -> Result<TimeSeriesStore, EditorError> {
        self.snapshot.take().ok_or(EditorError::NoHistory)
    }

    /// Whether an undo is available
    pub fn can_undo(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    /// Peek at the held snapshot
    pub fn snapshot(&self) -> Option<&TimeSeriesStore> {
        self.snapshot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TimeSeriesStore {
        TimeSeriesStore::from_channels(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![5.0, 6.0, 7.0, 8.0],
            vec![1.0, 1.0, 1.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_restores_original() {
        let mut history = EditHistory::new();
        let mut s = store();
        let original = s.clone();

        history.capture(&s);
        s.delete_range(1, 2).unwrap();
        s.restore(history.consume().unwrap());

        assert_eq!(s, original);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_consume_empty_fails() {
        let mut history = EditHistory::new();
        assert_eq!(history.consume().unwrap_err(), EditorError::NoHistory);
    }

    #[test]
    fn test_capture_overwrites() {
        let mut history = EditHistory::new();
        let mut s = store();
        history.capture(&s);
        s.delete_range(0, 0).unwrap();
        history.capture(&s);

        assert_eq!(history.consume().unwrap().len(), 3);
        assert!(history.consume().is_err());
    }
}

//! Mutable three-channel time-series buffer
//!
//! The store keeps `time`, `primary` and `reference` index-aligned. Every
//! mutation touches all three in one step so no caller ever observes
//! channels of different lengths.

use crate::error::EditorError;
use crate::types::{ChannelTable, Sample, PRIMARY_CHANNEL, REFERENCE_CHANNEL, REQUIRED_CHANNELS, TIME_CHANNEL};

/// Index-aligned time series with a time axis and two signals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesStore {
    time: Vec<f64>,
    primary: Vec<f64>,
    reference: Vec<f64>,
}

impl TimeSeriesStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store directly from channels, validating alignment
    pub fn from_channels(
        time: Vec<f64>,
        primary: Vec<f64>,
        reference: Vec<f64>,
    ) -> Result<Self, EditorError> {
        if time.len() != primary.len() || time.len() != reference.len() {
            return Err(EditorError::Schema(format!(
                "channel lengths differ: time={}, primary={}, reference={}",
                time.len(),
                primary.len(),
                reference.len()
            )));
        }
        Ok(Self {
            time,
            primary,
            reference,
        })
    }

    /// Replace all channels from an ingested table
    ///
    /// On error the store is left untouched.
    pub fn load(&mut self, mut table: ChannelTable) -> Result<(), EditorError> {
        let missing: Vec<&str> = REQUIRED_CHANNELS
            .iter()
            .copied()
            .filter(|name| !table.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(EditorError::Schema(format!(
                "table is missing channels: {}",
                missing.join(", ")
            )));
        }

        let (Some(time), Some(primary), Some(reference)) = (
            table.take(TIME_CHANNEL),
            table.take(PRIMARY_CHANNEL),
            table.take(REFERENCE_CHANNEL),
        ) else {
            return Err(EditorError::Schema("table is missing channels".to_string()));
        };

        *self = Self::from_channels(time, primary, reference)?;
        tracing::info!(samples = self.len(), "Loaded time series");
        Ok(())
    }

    /// Remove samples `start..=end` from all channels
    ///
    /// Afterwards, indices above `end` refer to positions shifted down by
    /// `end - start + 1`; see [`TimeSeriesStore::shift_index`].
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<(), EditorError> {
        let len = self.len();
        if start > end || end >= len {
            return Err(EditorError::IndexOutOfRange { start, end, len });
        }
        self.time.drain(start..=end);
        self.primary.drain(start..=end);
        self.reference.drain(start..=end);
        tracing::info!(start, end, remaining = self.len(), "Deleted sample range");
        Ok(())
    }

    /// Replace the store wholesale with a prior snapshot
    pub fn restore(&mut self, snapshot: TimeSeriesStore) {
        *self = snapshot;
    }

    /// Map an index from before `delete_range(start, end)` to after it
    ///
    /// Returns `None` for indices inside the removed range.
    pub fn shift_index(index: usize, start: usize, end: usize) -> Option<usize> {
        if index < start {
            Some(index)
        } else if index <= end {
            None
        } else {
            Some(index - (end - start + 1))
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.len()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn primary(&self) -> &[f64] {
        &self.primary
    }

    pub fn reference(&self) -> &[f64] {
        &self.reference
    }

    /// Get one aligned row
    pub fn sample(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            index,
            time: *self.time.get(index)?,
            primary: *self.primary.get(index)?,
            reference: *self.reference.get(index)?,
        })
    }

    /// Combined (min, max) over both signals, ignoring NaN
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.primary
            .iter()
            .chain(self.reference.iter())
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Index of the sample whose time is closest to `x`
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        self.time
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_nan())
            .min_by(|(_, a), (_, b)| {
                (*a - x)
                    .abs()
                    .partial_cmp(&(*b - x).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }

    /// Copy the channels out as a table keyed by canonical channel names
    pub fn to_table(&self) -> ChannelTable {
        ChannelTable::from_channels(
            self.time.clone(),
            self.primary.clone(),
            self.reference.clone(),
        )
    }
}

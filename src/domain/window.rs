// Rolling window of readings backing the chart
use super::reading::Reading;
use crate::error::{DashboardError, Result};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Fixed-capacity FIFO history. Always holds exactly `capacity` readings,
/// ordered oldest to newest.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    readings: VecDeque<Reading>,
    capacity: usize,
    version: u64,
}

impl RollingWindow {
    /// Window filled with zero-valued placeholders.
    pub fn new(capacity: usize, created_at: DateTime<Utc>) -> Result<Self> {
        Self::with_history(capacity, &[], created_at)
    }

    /// Window seeded from `history` (oldest first). Only the newest
    /// `capacity` readings are kept; missing slots are padded at the front,
    /// stamped no later than the oldest kept reading.
    pub fn with_history(
        capacity: usize,
        history: &[Reading],
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(DashboardError::EmptyWindow);
        }

        let kept = &history[history.len().saturating_sub(capacity)..];
        let padded_at = kept
            .first()
            .map_or(created_at, |oldest| oldest.timestamp.min(created_at));
        let mut readings = VecDeque::with_capacity(capacity);
        for _ in kept.len()..capacity {
            readings.push_back(Reading::placeholder(padded_at));
        }
        readings.extend(kept.iter().copied());

        Ok(Self {
            readings,
            capacity,
            version: 0,
        })
    }

    /// Append `reading` as the newest element and return the evicted oldest one.
    pub fn append(&mut self, reading: Reading) -> Reading {
        // len == capacity >= 1, so there is always something to evict
        let evicted = self.readings.pop_front().unwrap_or(reading);
        self.readings.push_back(reading);
        self.version += 1;
        debug_assert_eq!(self.len(), self.capacity);
        evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> + '_ {
        self.readings.iter()
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of appends since the window was created.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Owned copy handed to renderers so they never alias the live buffer.
    pub fn snapshot(&self) -> Vec<Reading> {
        self.iter().copied().collect()
    }
}

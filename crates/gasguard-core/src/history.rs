use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::reading::Reading;

// ---------------------------------------------------------------------------
// HistoryBuffer
// ---------------------------------------------------------------------------

/// Bounded most-recent-N ring of readings for live display.
///
/// Independent of the durable alert log: every reading is retained here
/// regardless of alert level, and the oldest is evicted once `capacity` is
/// exceeded.
#[derive(Debug)]
pub struct HistoryBuffer {
    readings: VecDeque<Reading>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            readings: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn append(&mut self, reading: Reading) {
        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    /// Up to `n` most recent readings, newest first. Asking for more than
    /// is stored returns everything available.
    pub fn recent(&self, n: usize) -> Vec<Reading> {
        self.readings.iter().rev().take(n).cloned().collect()
    }

    /// Readings captured within `[start, end]`, oldest first.
    pub fn range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Reading> {
        self.readings
            .iter()
            .filter(|r| r.captured_at >= start && r.captured_at <= end)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

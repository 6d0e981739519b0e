//! Bounded, time-ordered sample history

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::models::{MetadataDataPoint, PerformanceDataPoint};

/// Samples kept per window: 24 hours at 5-minute resolution
pub const MAX_HISTORY: usize = 288;

/// A sample with a capture time
pub trait Timestamped {
    /// When the sample was taken
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for PerformanceDataPoint {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for MetadataDataPoint {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Fixed-capacity history sorted by timestamp, oldest first
///
/// When full, each push drops the oldest sample.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T: Timestamped + Clone> RollingWindow<T> {
    /// Creates an empty window; a capacity of 0 is raised to 1
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds a sample, keeping the window sorted and bounded
    ///
    /// Samples normally arrive in order and go to the tail. A late sample
    /// is inserted after every sample with the same or an earlier time.
    pub fn push(&mut self, sample: T) {
        let ts = sample.timestamp();
        if self.samples.back().is_none_or(|last| last.timestamp() <= ts) {
            self.samples.push_back(sample);
        } else {
            let at = self.samples.partition_point(|s| s.timestamp() <= ts);
            self.samples.insert(at, sample);
        }
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Most recent sample
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    /// Samples, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    /// Copies the samples out, oldest first
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }

    /// Number of samples held
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` before the first sample
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Timestamped + Clone> Default for RollingWindow<T> {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

//! Time-bounded store of the most recent samples.

use std::collections::VecDeque;
use std::num::NonZeroU64;

use log::debug;

use super::sample::{Sample, Snapshot};

/// Ordered, time-bounded sample store.
///
/// Samples are kept sorted by timestamp (ties keep insertion order). A sample
/// is retained while `timestamp_ms > now - window`, so after every eviction
/// pass the buffer holds exactly the samples of the trailing window.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    live: VecDeque<Sample>,
    window_secs: NonZeroU64,
}

impl WindowBuffer {
    pub fn new(window_secs: NonZeroU64) -> Self {
        Self {
            live: VecDeque::new(),
            window_secs,
        }
    }

    pub fn window_secs(&self) -> NonZeroU64 {
        self.window_secs
    }

    fn window_ms(&self) -> i64 {
        i64::try_from(self.window_secs.get())
            .unwrap_or(i64::MAX)
            .saturating_mul(1000)
    }

    /// Earliest timestamp that is no longer retained at `now_ms`.
    pub fn horizon(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.window_ms())
    }

    /// Insert `sample` and run an eviction pass against `now_ms`.
    ///
    /// In-order samples go to the back. A late sample is placed after every
    /// retained sample with a timestamp less than or equal to its own.
    pub fn append(&mut self, sample: Sample, now_ms: i64) {
        match self.live.back() {
            Some(last) if sample.timestamp_ms < last.timestamp_ms => {
                let idx = self
                    .live
                    .partition_point(|s| s.timestamp_ms <= sample.timestamp_ms);
                self.live.insert(idx, sample);
            }
            _ => self.live.push_back(sample),
        }
        self.evict(now_ms);
    }

    /// Change the retention window and evict immediately against `now_ms`.
    pub fn set_window_duration(&mut self, window_secs: NonZeroU64, now_ms: i64) -> usize {
        self.window_secs = window_secs;
        self.evict(now_ms)
    }

    /// Drop every sample at or before the horizon. Returns the number evicted.
    pub fn evict(&mut self, now_ms: i64) -> usize {
        let horizon = self.horizon(now_ms);
        let before = self.live.len();
        // Sorted storage makes the expired samples a prefix.
        while self
            .live
            .front()
            .is_some_and(|s| s.timestamp_ms <= horizon)
        {
            self.live.pop_front();
        }
        let evicted = before - self.live.len();
        if evicted > 0 {
            debug!("evicted {evicted} samples at or before {horizon}");
        }
        evicted
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_vec(self.live.iter().copied().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.live.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.live.back()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

use std::ops::Deref;
use std::sync::Arc;

/// One timestamped scalar observation.
///
/// `timestamp_ms` is milliseconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp_ms: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }

    /// Timestamp in (fractional) seconds, the unit the plot's X axis uses.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ms as f64 * 1e-3
    }

    /// `[x, y]` pair as consumed by `egui_plot`.
    pub fn to_plot_point(&self) -> [f64; 2] {
        [self.timestamp_secs(), self.value]
    }
}

/// Immutable, point-in-time copy of the window buffer.
///
/// Cloning is cheap and never observes later appends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    samples: Arc<[Sample]>,
}

impl Snapshot {
    pub(crate) fn from_vec(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl Deref for Snapshot {
    type Target = [Sample];

    fn deref(&self) -> &[Sample] {
        &self.samples
    }
}

//! Push-based feed for samples produced outside the session.
//!
//! Any external source (sensor thread, socket reader, metrics emitter) can
//! stand in for the local producer: create a channel, hand the `SampleSink`
//! to the source and attach the receiver to a session. The session drains
//! the receiver on every poll.

use std::sync::mpsc::{Receiver, SendError, Sender};

use crate::data::sample::Sample;

/// Convenience sender for feeding samples into a session.
#[derive(Clone, Debug)]
pub struct SampleSink {
    tx: Sender<Sample>,
}

impl SampleSink {
    /// Send a single `Sample`. Fails once the session has detached the feed.
    pub fn send(&self, sample: Sample) -> Result<(), SendError<Sample>> {
        self.tx.send(sample)
    }

    /// Send a value observed at `timestamp_ms`.
    #[inline]
    pub fn send_value(&self, timestamp_ms: i64, value: f64) -> Result<(), SendError<Sample>> {
        self.tx.send(Sample::new(timestamp_ms, value))
    }

    /// Send a chunk of samples, stopping at the first failure.
    pub fn send_all<I>(&self, samples: I) -> Result<(), SendError<Sample>>
    where
        I: IntoIterator<Item = Sample>,
    {
        samples.into_iter().try_for_each(|s| self.tx.send(s))
    }
}

/// Create a new channel pair: `(SampleSink, Receiver<Sample>)`.
pub fn channel_samples() -> (SampleSink, Receiver<Sample>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (SampleSink { tx }, rx)
}

//! Local sample producer and the cooperative tick scheduler that drives it.

use log::{debug, info};

use crate::controls::RunState;
use crate::data::sample::Sample;
use crate::data::signal::Waveform;

/// Emits one sample per tick while running.
pub struct Producer {
    waveform: Box<dyn Waveform>,
    last_timestamp_ms: Option<i64>,
    emitted: u64,
    stopped: bool,
}

impl Producer {
    pub fn new(waveform: Box<dyn Waveform>) -> Self {
        Self {
            waveform,
            last_timestamp_ms: None,
            emitted: 0,
            stopped: false,
        }
    }

    /// Produce the sample for this tick, or `None` when paused or stopped.
    ///
    /// Timestamps never go backwards: a clock step back is clamped to the
    /// previous emission time.
    pub fn tick(&mut self, run_state: RunState, now_ms: i64) -> Option<Sample> {
        if self.stopped || run_state.is_paused() {
            return None;
        }
        let timestamp_ms = self
            .last_timestamp_ms
            .map_or(now_ms, |last| now_ms.max(last));
        let value = self.waveform.value_at(timestamp_ms);
        self.last_timestamp_ms = Some(timestamp_ms);
        self.emitted += 1;
        debug!("produced sample t={timestamp_ms} y={value}");
        Some(Sample::new(timestamp_ms, value))
    }

    /// Permanently halt this instance.
    pub fn stop(&mut self) {
        if !self.stopped {
            info!("producer stopped after {} samples", self.emitted);
        }
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl std::fmt::Debug for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer")
            .field("last_timestamp_ms", &self.last_timestamp_ms)
            .field("emitted", &self.emitted)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

/// Fixed-period scheduler polled from a host event loop.
///
/// Fires at most once per `poll`. Periods that elapse without a poll are
/// skipped rather than replayed, and the next deadline stays on the
/// original period grid.
#[derive(Debug, Clone)]
pub struct Ticker {
    period_ms: i64,
    next_due_ms: Option<i64>,
}

impl Ticker {
    /// First tick is due one period after `now_ms`. `period_ms` is clamped to at least 1.
    pub fn new(period_ms: u64, now_ms: i64) -> Self {
        let period_ms = i64::try_from(period_ms).unwrap_or(i64::MAX).max(1);
        Self {
            period_ms,
            next_due_ms: Some(now_ms.saturating_add(period_ms)),
        }
    }

    pub fn period_ms(&self) -> i64 {
        self.period_ms
    }

    pub fn next_due_ms(&self) -> Option<i64> {
        self.next_due_ms
    }

    pub fn poll(&mut self, now_ms: i64) -> bool {
        let Some(due) = self.next_due_ms else {
            return false;
        };
        if now_ms < due {
            return false;
        }
        let skipped = (now_ms - due) / self.period_ms;
        if skipped > 0 {
            debug!("skipped {skipped} missed ticks");
        }
        self.next_due_ms = Some(due.saturating_add((skipped + 1).saturating_mul(self.period_ms)));
        true
    }

    /// Move the next deadline to the first period boundary strictly after `now_ms`.
    pub fn realign(&mut self, now_ms: i64) {
        if let Some(due) = self.next_due_ms {
            if due <= now_ms {
                let skipped = (now_ms - due) / self.period_ms + 1;
                self.next_due_ms = Some(due.saturating_add(skipped.saturating_mul(self.period_ms)));
            }
        }
    }

    /// Cancel the pending tick; a disarmed ticker never fires again.
    pub fn disarm(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_producer() -> Producer {
        let mut n = 0.0;
        Producer::new(Box::new(move |_t: i64| {
            n += 1.0;
            n
        }))
    }

    #[test]
    fn paused_tick_emits_nothing() {
        let mut p = counting_producer();
        assert!(p.tick(RunState::Paused, 1_000).is_none());
        assert_eq!(p.emitted(), 0);
        assert_eq!(p.tick(RunState::Running, 1_000).map(|s| s.value), Some(1.0));
    }

    #[test]
    fn stopped_producer_stays_silent() {
        let mut p = counting_producer();
        p.stop();
        assert!(p.tick(RunState::Running, 1_000).is_none());
        assert!(p.is_stopped());
    }

    #[test]
    fn timestamps_never_decrease() {
        let mut p = counting_producer();
        let a = p.tick(RunState::Running, 5_000).unwrap();
        let b = p.tick(RunState::Running, 4_000).unwrap();
        assert_eq!(a.timestamp_ms, 5_000);
        assert_eq!(b.timestamp_ms, 5_000);
    }

    #[test]
    fn ticker_fires_on_period_boundaries() {
        let mut t = Ticker::new(500, 0);
        assert!(!t.poll(499));
        assert!(t.poll(500));
        assert!(!t.poll(500));
        assert!(!t.poll(999));
        assert!(t.poll(1_000));
    }

    #[test]
    fn ticker_skips_missed_periods() {
        let mut t = Ticker::new(100, 0);
        assert!(t.poll(1_050));
        assert!(!t.poll(1_050));
        assert_eq!(t.next_due_ms(), Some(1_100));
    }

    #[test]
    fn realign_skips_elapsed_boundaries() {
        let mut t = Ticker::new(1_000, 0);
        t.realign(3_000);
        assert_eq!(t.next_due_ms(), Some(4_000));
        assert!(!t.poll(3_500));
        t.realign(3_500);
        assert_eq!(t.next_due_ms(), Some(4_000));
    }

    #[test]
    fn disarmed_ticker_never_fires() {
        let mut t = Ticker::new(100, 0);
        t.disarm();
        assert!(!t.poll(10_000));
        assert!(!t.is_armed());
    }
}

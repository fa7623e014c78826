//! The session owns every piece of mutable pipeline state.
//!
//! A `TelemetrySession` bundles the clock, window buffer, control surface,
//! producer, tick scheduler and an optional external feed. All mutation goes
//! through `&mut self`, so whoever owns the session (an egui app, a tokio
//! task, a test) serialises appends, evictions and control actions.

use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use log::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::TelemetryConfig;
use crate::controls::{Controls, RunState};
use crate::data::downsample;
use crate::data::export;
use crate::data::sample::{Sample, Snapshot};
use crate::data::signal::{NoisySine, Waveform};
use crate::data::window::WindowBuffer;
use crate::error::Result;
use crate::producer::{Producer, Ticker};
use crate::sink::{channel_samples, SampleSink};

pub struct TelemetrySession {
    clock: Arc<dyn Clock>,
    buffer: WindowBuffer,
    controls: Controls,
    producer: Producer,
    ticker: Ticker,
    feed: Option<Receiver<Sample>>,
    tick_interval_ms: u64,
    max_points: usize,
    noise_seed: Option<u64>,
    stopped: bool,
}

impl TelemetrySession {
    /// Session on the system clock with the default noisy sine producer.
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &TelemetryConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let waveform = Box::new(NoisySine::new(config.noise_seed));
        Self::with_parts(config, clock, waveform)
    }

    pub fn with_parts(
        config: &TelemetryConfig,
        clock: Arc<dyn Clock>,
        waveform: Box<dyn Waveform>,
    ) -> Result<Self> {
        config.validate()?;
        let mut controls = Controls::new(std::num::NonZeroU64::MIN);
        let window = controls.set_window_duration(config.window_secs)?;
        let now = clock.now_ms();
        Ok(Self {
            buffer: WindowBuffer::new(window),
            controls,
            producer: Producer::new(waveform),
            ticker: Ticker::new(config.tick_interval_ms, now),
            feed: None,
            tick_interval_ms: config.tick_interval_ms,
            max_points: config.max_points,
            noise_seed: config.noise_seed,
            stopped: false,
            clock,
        })
    }

    // ── Scheduling ───────────────────────────────────────────────────────────

    /// Drain the external feed and fire the producer if a tick is due.
    ///
    /// Meant to be called from the host event loop (once per frame is
    /// plenty). Returns the number of samples appended.
    pub fn poll(&mut self) -> usize {
        if self.stopped {
            return 0;
        }
        let now = self.clock.now_ms();
        let mut appended = self.drain_feed(now);
        if self.ticker.poll(now) && self.emit(now).is_some() {
            appended += 1;
        }
        appended
    }

    /// Fire the producer immediately, bypassing the internal ticker.
    ///
    /// For owners that run their own periodic timer.
    pub fn tick(&mut self) -> Option<Sample> {
        if self.stopped {
            return None;
        }
        let now = self.clock.now_ms();
        self.emit(now)
    }

    /// Append whatever the external feed has queued (dropped while paused).
    pub fn drain_sink(&mut self) -> usize {
        if self.stopped {
            return 0;
        }
        let now = self.clock.now_ms();
        self.drain_feed(now)
    }

    fn emit(&mut self, now: i64) -> Option<Sample> {
        let sample = self.producer.tick(self.controls.run_state(), now)?;
        self.buffer.append(sample, now);
        Some(sample)
    }

    fn drain_feed(&mut self, now: i64) -> usize {
        let Some(rx) = &self.feed else {
            return 0;
        };
        let paused = self.controls.run_state().is_paused();
        let mut appended = 0;
        let mut dropped = 0;
        while let Ok(sample) = rx.try_recv() {
            if paused {
                dropped += 1;
                continue;
            }
            self.buffer.append(sample, now);
            appended += 1;
        }
        if dropped > 0 {
            debug!("dropped {dropped} fed samples while paused");
        }
        appended
    }

    // ── Control surface ──────────────────────────────────────────────────────

    /// Flip between `Running` and `Paused`.
    ///
    /// The feed is drained under the outgoing state first: samples pushed
    /// while running are kept on pause, samples pushed while paused are
    /// dropped on resume.
    ///
    /// On resume the next sample comes at the next period boundary; ticks
    /// missed while paused are never replayed.
    pub fn toggle_pause(&mut self) -> RunState {
        let now = self.clock.now_ms();
        if !self.stopped {
            self.drain_feed(now);
        }
        let state = self.controls.toggle_pause();
        if !state.is_paused() {
            self.ticker.realign(now);
        }
        state
    }

    pub fn pause(&mut self) {
        if !self.is_paused() {
            self.toggle_pause();
        }
    }

    pub fn resume(&mut self) {
        if self.is_paused() {
            self.toggle_pause();
        }
    }

    pub fn run_state(&self) -> RunState {
        self.controls.run_state()
    }

    pub fn is_paused(&self) -> bool {
        self.controls.run_state().is_paused()
    }

    /// Change the retention window and evict against it immediately.
    ///
    /// Zero is rejected with `InvalidArgument` and nothing changes. Returns
    /// the number of samples evicted.
    pub fn set_window_duration(&mut self, secs: u64) -> Result<usize> {
        let window = self.controls.set_window_duration(secs)?;
        let now = self.clock.now_ms();
        Ok(self.buffer.set_window_duration(window, now))
    }

    pub fn window_secs(&self) -> u64 {
        self.controls.window_secs().get()
    }

    // ── Readers ──────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        self.buffer.snapshot()
    }

    /// At most `max_points` representative samples for a renderer.
    pub fn downsampled_series(&self, max_points: usize) -> Result<Vec<Sample>> {
        let snap = self.buffer.snapshot();
        Ok(downsample::reduce(snap.samples(), max_points)?.into_owned())
    }

    /// CSV of the full window, taken from a single snapshot.
    pub fn export_csv(&self) -> Vec<u8> {
        export::encode_csv(&self.buffer.snapshot())
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        export::save_csv_path(path, &self.buffer.snapshot())
    }

    #[cfg(feature = "parquet")]
    pub fn save_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        export::save_parquet_path(path, &self.buffer.snapshot())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn latest(&self) -> Option<Sample> {
        self.buffer.latest().copied()
    }

    /// Point budget from the configuration.
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // ── External feed ────────────────────────────────────────────────────────

    /// Open a push feed into this session, replacing any previous one.
    pub fn attach_sink(&mut self) -> SampleSink {
        let (sink, rx) = channel_samples();
        self.feed = Some(rx);
        sink
    }

    /// Drop the feed receiver; senders start failing.
    pub fn detach_sink(&mut self) {
        self.feed = None;
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Stop producing for good: cancels the pending tick and detaches the feed.
    /// Retained samples stay readable.
    pub fn stop(&mut self) {
        self.producer.stop();
        self.ticker.disarm();
        self.feed = None;
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Replace the producer with a fresh noisy sine instance and reschedule.
    pub fn restart_producer(&mut self) {
        let waveform = Box::new(NoisySine::new(self.noise_seed));
        self.restart_producer_with(waveform);
    }

    /// Replace the producer, reset the run state to `Running` and schedule the
    /// first tick one period from now.
    pub fn restart_producer_with(&mut self, waveform: Box<dyn Waveform>) {
        self.producer.stop();
        self.producer = Producer::new(waveform);
        self.ticker = Ticker::new(self.tick_interval_ms, self.clock.now_ms());
        self.controls.reset();
        self.stopped = false;
        info!("producer restarted");
    }
}

impl std::fmt::Debug for TelemetrySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetrySession")
            .field("buffer_len", &self.buffer.len())
            .field("controls", &self.controls)
            .field("producer", &self.producer)
            .field("ticker", &self.ticker)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

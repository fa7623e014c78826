#![allow(dead_code)]

use std::sync::Arc;

use livetelemetry::{ManualClock, TelemetryConfig, TelemetrySession};

pub const TICK_MS: i64 = 1_000;

pub fn config(window_secs: u64) -> TelemetryConfig {
    TelemetryConfig {
        tick_interval_ms: TICK_MS as u64,
        window_secs,
        noise_seed: Some(1),
        ..Default::default()
    }
}

/// Session on a manual clock starting at 0, ticking every second.
pub fn session(window_secs: u64) -> (TelemetrySession, ManualClock) {
    let clock = ManualClock::new(0);
    let s = TelemetrySession::with_clock(&config(window_secs), Arc::new(clock.clone())).unwrap();
    (s, clock)
}

/// Advance one period and poll, `n` times.
pub fn run_ticks(s: &mut TelemetrySession, clock: &ManualClock, n: usize) {
    for _ in 0..n {
        clock.advance(TICK_MS);
        s.poll();
    }
}

pub fn timestamps(s: &TelemetrySession) -> Vec<i64> {
    s.snapshot().iter().map(|x| x.timestamp_ms).collect()
}

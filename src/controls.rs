//! Control surface: run state machine and window-duration validation.

use std::num::NonZeroU64;

use log::{info, warn};

use crate::error::{Result, TelemetryError};

/// Two-state machine; `toggle` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

impl RunState {
    pub fn toggled(self) -> Self {
        match self {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        }
    }

    pub fn is_paused(self) -> bool {
        self == RunState::Paused
    }
}

/// Process-wide mutable state of a session: run state and window duration.
#[derive(Debug, Clone)]
pub struct Controls {
    run_state: RunState,
    window_secs: NonZeroU64,
}

impl Controls {
    pub fn new(window_secs: NonZeroU64) -> Self {
        Self {
            run_state: RunState::Running,
            window_secs,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn window_secs(&self) -> NonZeroU64 {
        self.window_secs
    }

    pub fn toggle_pause(&mut self) -> RunState {
        self.run_state = self.run_state.toggled();
        info!(
            "telemetry {}",
            if self.run_state.is_paused() { "paused" } else { "resumed" }
        );
        self.run_state
    }

    /// Force `Running`, used when a fresh producer is scheduled.
    pub(crate) fn reset(&mut self) {
        self.run_state = RunState::Running;
    }

    /// Validate and store a new window duration.
    ///
    /// Zero is rejected without touching the current value; the caller is
    /// expected to forward the returned value to the window buffer.
    pub fn set_window_duration(&mut self, secs: u64) -> Result<NonZeroU64> {
        let Some(window) = NonZeroU64::new(secs) else {
            warn!("rejected window duration of {secs}s");
            return Err(TelemetryError::invalid(
                "window_secs",
                "window duration must be positive",
            ));
        };
        self.window_secs = window;
        info!("window duration set to {secs}s");
        Ok(window)
    }
}

/// Validate a window duration coming from a signed source (e.g. a UI field).
pub fn window_secs_from_signed(secs: i64) -> Result<u64> {
    u64::try_from(secs)
        .ok()
        .filter(|&s| s > 0)
        .ok_or_else(|| {
            TelemetryError::invalid("window_secs", format!("{secs} is not a positive duration"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_alternates() {
        let mut c = Controls::new(NonZeroU64::new(60).unwrap());
        assert_eq!(c.run_state(), RunState::Running);
        assert_eq!(c.toggle_pause(), RunState::Paused);
        assert_eq!(c.toggle_pause(), RunState::Running);
    }

    #[test]
    fn zero_window_leaves_state_unchanged() {
        let mut c = Controls::new(NonZeroU64::new(60).unwrap());
        c.toggle_pause();
        assert!(c.set_window_duration(0).unwrap_err().is_invalid_argument());
        assert_eq!(c.window_secs().get(), 60);
        assert_eq!(c.run_state(), RunState::Paused);
    }

    #[test]
    fn signed_windows() {
        assert_eq!(window_secs_from_signed(30).unwrap(), 30);
        assert!(window_secs_from_signed(0).is_err());
        assert!(window_secs_from_signed(-5).is_err());
    }
}

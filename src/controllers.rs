//! Controllers for interacting with a running session from external code.
//!
//! The session itself is owned by a single event loop (the dashboard window
//! or a test). A controller records requests from any thread; the owner
//! applies them once per frame with [`UiActionController::apply_requests`]
//! and publishes the outcome to subscribers.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use log::warn;

use crate::session::TelemetrySession;

/// Outcome of an applied request, broadcast to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    Paused,
    Resumed,
    WindowChanged { secs: u64, evicted: usize },
    WindowRejected { secs: u64, reason: String },
    Exported { path: PathBuf, samples: usize },
    ExportFailed { path: PathBuf, reason: String },
}

/// Controller for high-level actions: pause/resume, window size and CSV export.
#[derive(Clone, Default)]
pub struct UiActionController {
    pub(crate) inner: Arc<Mutex<UiActionInner>>, // crate-visible for UI
}

#[derive(Default)]
pub(crate) struct UiActionInner {
    pub(crate) request_pause: Option<bool>,
    pub(crate) request_toggle: bool,
    pub(crate) request_window_secs: Option<u64>,
    pub(crate) request_save_csv_to: Option<PathBuf>,
    pub(crate) listeners: Vec<Sender<ControllerEvent>>,
}

impl UiActionController {
    /// Create a fresh controller.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, UiActionInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Request the session to pause.
    pub fn pause(&self) {
        let mut inner = self.lock();
        inner.request_toggle = false;
        inner.request_pause = Some(true);
    }

    /// Request the session to resume live updates.
    pub fn resume(&self) {
        let mut inner = self.lock();
        inner.request_toggle = false;
        inner.request_pause = Some(false);
    }

    /// Request a pause/resume flip relative to whatever state the session is in.
    pub fn toggle_pause(&self) {
        let mut inner = self.lock();
        inner.request_pause = None;
        inner.request_toggle = !inner.request_toggle;
    }

    /// Request a new window duration. Validation happens when applied.
    pub fn request_window_secs(&self, secs: u64) {
        self.lock().request_window_secs = Some(secs);
    }

    /// Request saving the full window as CSV to the exact path (non-interactive).
    pub fn request_save_csv_to_path<P: Into<PathBuf>>(&self, path: P) {
        self.lock().request_save_csv_to = Some(path.into());
    }

    /// Subscribe to outcomes of applied requests.
    pub fn subscribe(&self) -> Receiver<ControllerEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.lock().listeners.push(tx);
        rx
    }

    /// Apply pending requests to `session` in a fixed order: run state,
    /// window, export. Returns the number of requests applied.
    pub fn apply_requests(&self, session: &mut TelemetrySession) -> usize {
        let (pause, toggle, window, save_to) = {
            let mut inner = self.lock();
            (
                inner.request_pause.take(),
                std::mem::take(&mut inner.request_toggle),
                inner.request_window_secs.take(),
                inner.request_save_csv_to.take(),
            )
        };
        let applied = usize::from(pause.is_some() || toggle)
            + usize::from(window.is_some())
            + usize::from(save_to.is_some());
        let mut events = Vec::new();

        let before = session.run_state();
        match pause {
            Some(true) => session.pause(),
            Some(false) => session.resume(),
            None if toggle => {
                session.toggle_pause();
            }
            None => {}
        }
        if session.run_state() != before {
            events.push(if session.is_paused() {
                ControllerEvent::Paused
            } else {
                ControllerEvent::Resumed
            });
        }

        if let Some(secs) = window {
            events.push(match session.set_window_duration(secs) {
                Ok(evicted) => ControllerEvent::WindowChanged { secs, evicted },
                Err(e) => ControllerEvent::WindowRejected {
                    secs,
                    reason: e.to_string(),
                },
            });
        }

        if let Some(path) = save_to {
            let samples = session.len();
            events.push(match session.save_csv(&path) {
                Ok(()) => ControllerEvent::Exported { path, samples },
                Err(e) => {
                    warn!("Failed to save CSV to {}: {e}", path.display());
                    ControllerEvent::ExportFailed {
                        path,
                        reason: e.to_string(),
                    }
                }
            });
        }

        if !events.is_empty() {
            let mut inner = self.lock();
            for ev in events {
                inner.listeners.retain(|s| s.send(ev.clone()).is_ok());
            }
        }
        applied
    }
}

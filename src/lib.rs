//! Live telemetry crate root: re-exports and module wiring.
//!
//! A stream of timestamped samples is kept in a time-bounded window, reduced
//! to a bounded point count for rendering, and exported as CSV on demand:
//! - `data`: samples, the window buffer, downsampling, export and the synthetic signal
//! - `producer`: local sample producer and its tick scheduler
//! - `controls`: pause/resume state machine and window validation
//! - `session`: the object owning all of the above
//! - `sink`: push feed for external sources
//! - `controllers`: thread-safe remote control of a running dashboard
//! - `runtime`: tokio task owning a session (feature `runtime`)
//! - `app`: egui/eframe dashboard

pub mod app;
pub mod clock;
pub mod config;
pub mod controllers;
pub mod controls;
pub mod data;
pub mod error;
pub mod producer;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod session;
pub mod sink;

// Public re-exports for a compact external API
pub use app::{run_dashboard, DashboardApp};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DashboardOptions, TelemetryConfig};
pub use controllers::{ControllerEvent, UiActionController};
pub use controls::RunState;
pub use data::downsample::reduce;
pub use data::export::{encode_csv, parse_csv};
pub use data::sample::{Sample, Snapshot};
pub use data::signal::{NoisySine, Waveform};
pub use data::window::WindowBuffer;
pub use error::{Result, TelemetryError};
pub use session::TelemetrySession;
pub use sink::{channel_samples, SampleSink};

#[cfg(feature = "runtime")]
pub use runtime::{spawn_session, TelemetryCommand, TelemetryHandle};

//! egui/eframe renderer for a telemetry session.

mod dashboard;
mod run;

pub use dashboard::{format_clock_time, DashboardApp};
pub use run::run_dashboard;

//! Top-level entry point for running the dashboard as a native window.

use eframe::egui;
use log::info;

use crate::config::{DashboardOptions, TelemetryConfig};

use super::dashboard::DashboardApp;

/// Launch the telemetry dashboard in a native window.
///
/// 1. Validates `config` and builds a session on the system clock.
/// 2. Installs the Phosphor icon font used by the toolbar.
/// 3. Enters the eframe event loop; the session is polled every frame.
///
/// The call blocks until the window is closed. Closing the window drops the
/// app, which stops the producer.
pub fn run_dashboard(config: TelemetryConfig, mut options: DashboardOptions) -> eframe::Result<()> {
    let mut opts = options
        .native_options
        .take()
        .unwrap_or_else(eframe::NativeOptions::default);

    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(960.0, 480.0));
    }

    let title = config.title.clone();
    info!("opening dashboard \"{title}\"");
    eframe::run_native(
        &title,
        opts,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            let app = DashboardApp::new(&config, &options)?;
            Ok(Box::new(app))
        }),
    )
}

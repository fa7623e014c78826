//! Dashboard UI: toolbar with live controls above a plot of the downsampled window.

use std::time::Duration;

use chrono::Local;
use egui_phosphor::regular::{DOWNLOAD_SIMPLE, PAUSE, PLAY};
use egui_plot::{Line, Plot};
use log::warn;

use crate::config::{window_label, DashboardOptions, TelemetryConfig};
use crate::controllers::UiActionController;
use crate::data::sample::Sample;
use crate::error::Result;
use crate::session::TelemetrySession;

/// Format seconds since the UNIX epoch as local `%H:%M:%S`.
pub fn format_clock_time(secs: f64) -> String {
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    chrono::DateTime::from_timestamp(whole as i64, nanos)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

pub struct DashboardApp {
    session: TelemetrySession,
    presets: Vec<u64>,
    export_file_name: String,
    controller: Option<UiActionController>,
    hide_export: bool,
    /// Last user-facing error, shown under the toolbar.
    status: Option<String>,
}

impl DashboardApp {
    pub fn new(config: &TelemetryConfig, options: &DashboardOptions) -> Result<Self> {
        let session = TelemetrySession::new(config)?;
        Ok(Self::with_session(session, config, options))
    }

    /// Wrap an existing session (custom clock, waveform or attached sink).
    pub fn with_session(
        session: TelemetrySession,
        config: &TelemetryConfig,
        options: &DashboardOptions,
    ) -> Self {
        let mut presets = config.window_presets.clone();
        if !presets.contains(&session.window_secs()) {
            presets.push(session.window_secs());
        }
        presets.sort_unstable();
        presets.dedup();
        Self {
            session,
            presets,
            export_file_name: config.export_file_name.clone(),
            controller: options.ui_action_controller.clone(),
            hide_export: options.hide_export,
            status: None,
        }
    }

    pub fn session(&self) -> &TelemetrySession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TelemetrySession {
        &mut self.session
    }

    /// Window choices offered by the selector, ascending.
    pub fn presets(&self) -> &[u64] {
        &self.presets
    }

    /// Advance the pipeline and draw the dashboard into `ui`.
    ///
    /// Can be called from any host `egui` app; the toolbar icons need the
    /// Phosphor font installed (see `egui_phosphor::add_to_fonts`).
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.advance();
        self.render_toolbar(ui);
        if let Some(msg) = &self.status {
            ui.colored_label(ui.visuals().error_fg_color, msg);
        }
        ui.separator();
        self.render_plot(ui);
    }

    /// Non-UI work for one frame: poll the session, then apply controller requests.
    pub fn advance(&mut self) -> usize {
        let appended = self.session.poll();
        if let Some(ctrl) = &self.controller {
            ctrl.apply_requests(&mut self.session);
        }
        appended
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let paused = self.session.is_paused();
            let text = if paused {
                format!("{PLAY} Resume")
            } else {
                format!("{PAUSE} Pause")
            };
            if ui.button(text).clicked() {
                self.session.toggle_pause();
            }

            let current = self.session.window_secs();
            let mut selected = current;
            egui::ComboBox::from_id_salt("telemetry_window")
                .selected_text(window_label(current))
                .show_ui(ui, |ui| {
                    for &secs in &self.presets {
                        ui.selectable_value(&mut selected, secs, window_label(secs));
                    }
                });
            if selected != current {
                match self.session.set_window_duration(selected) {
                    Ok(_) => self.status = None,
                    Err(e) => {
                        warn!("window change rejected: {e}");
                        self.status = Some(e.to_string());
                    }
                }
            }

            if !self.hide_export
                && ui
                    .button(format!("{DOWNLOAD_SIMPLE} Export CSV"))
                    .on_hover_text("Save every retained sample (not downsampled)")
                    .clicked()
            {
                self.export_with_dialog();
            }

            ui.separator();
            ui.weak(format!("Points: {}", self.session.len()));
        });
    }

    fn export_with_dialog(&mut self) {
        // Export reflects the window at click time, not after the dialog closes.
        let snapshot = self.session.snapshot();
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(self.export_file_name.as_str())
            .add_filter("CSV", &["csv"])
            .save_file()
        {
            if let Err(e) = crate::data::export::save_csv_path(&path, &snapshot) {
                warn!("Failed to export CSV: {e}");
                self.status = Some(format!("Export failed: {e}"));
            } else {
                self.status = None;
            }
        }
    }

    fn render_plot(&mut self, ui: &mut egui::Ui) {
        let series = match self.session.downsampled_series(self.session.max_points()) {
            Ok(series) => series,
            Err(e) => {
                self.status = Some(e.to_string());
                Vec::new()
            }
        };
        let pts: Vec<[f64; 2]> = series.iter().map(Sample::to_plot_point).collect();
        let follow = if self.session.is_paused() {
            None
        } else {
            self.session.latest().map(|s| {
                let t_latest = s.timestamp_secs();
                (t_latest - self.session.window_secs() as f64, t_latest)
            })
        };

        Plot::new("telemetry_plot")
            .allow_scroll(false)
            .allow_boxed_zoom(true)
            .x_axis_formatter(|x, _range| format_clock_time(x.value))
            .show(ui, |plot_ui| {
                if let Some((x_min, x_max)) = follow {
                    plot_ui.set_plot_bounds_x(x_min..=x_max);
                }
                plot_ui.line(Line::new("telemetry", pts).width(1.5));
            });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

impl Drop for DashboardApp {
    fn drop(&mut self) {
        // No tick may fire once the window is gone.
        self.session.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_has_hms_shape() {
        let s = format_clock_time(1_700_000_000.25);
        assert_eq!(s.len(), 8);
        assert_eq!(s.matches(':').count(), 2);
    }
}

//! Configuration for a telemetry session and its dashboard window.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::controllers::UiActionController;
use crate::error::{Result, TelemetryError};

// ─────────────────────────────────────────────────────────────────────────────
// TelemetryConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Serializable session configuration.
///
/// | Field              | Purpose |
/// |--------------------|---------|
/// | `tick_interval_ms` | Producer period |
/// | `window_secs`      | Initial retention window |
/// | `max_points`       | Point budget handed to the renderer |
/// | `window_presets`   | Choices offered by the window selector |
/// | `noise_seed`       | Fixed seed for the synthetic signal (`None` = OS entropy) |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Native window title.
    pub title: String,
    pub tick_interval_ms: u64,
    pub window_secs: u64,
    pub max_points: usize,
    pub window_presets: Vec<u64>,
    /// Default file name proposed by the export dialog.
    pub export_file_name: String,
    pub noise_seed: Option<u64>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            title: "Realtime Telemetry".to_string(),
            tick_interval_ms: 500,
            window_secs: 60,
            max_points: 240,
            window_presets: vec![30, 60, 300],
            export_file_name: "telemetry.csv".to_string(),
            noise_seed: None,
        }
    }
}

impl TelemetryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(TelemetryError::invalid(
                "tick_interval_ms",
                "tick interval must be positive",
            ));
        }
        if self.window_secs == 0 {
            return Err(TelemetryError::invalid(
                "window_secs",
                "window duration must be positive",
            ));
        }
        if self.max_points == 0 {
            return Err(TelemetryError::invalid(
                "max_points",
                "must be at least 1",
            ));
        }
        if self.window_presets.contains(&0) {
            return Err(TelemetryError::invalid(
                "window_presets",
                "presets must be positive",
            ));
        }
        Ok(())
    }

    /// Load from `path`; `.yaml`/`.yml` is read as YAML, anything else as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)?;
        let cfg: TelemetryConfig = if is_yaml(path) {
            serde_yaml::from_str(&s).map_err(|e| TelemetryError::Config(e.to_string()))?
        } else {
            serde_json::from_str(&s).map_err(|e| TelemetryError::Config(e.to_string()))?
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let s = if is_yaml(path) {
            serde_yaml::to_string(self).map_err(|e| TelemetryError::Config(e.to_string()))?
        } else {
            serde_json::to_string_pretty(self).map_err(|e| TelemetryError::Config(e.to_string()))?
        };
        std::fs::write(path, s)?;
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Human label for a window preset, e.g. `Last 30s`, `Last 5m`.
pub fn window_label(secs: u64) -> String {
    if secs >= 3600 && secs % 3600 == 0 {
        format!("Last {}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 && secs != 60 {
        format!("Last {}m", secs / 60)
    } else {
        format!("Last {secs}s")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DashboardOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Runtime-only options for the dashboard window (not serialized).
#[derive(Clone, Default)]
pub struct DashboardOptions {
    /// Optional eframe native-window options.
    pub native_options: Option<eframe::NativeOptions>,
    /// External controller for pause/window/export requests.
    pub ui_action_controller: Option<UiActionController>,
    /// Hide the export button (e.g. for kiosk displays).
    pub hide_export: bool,
}

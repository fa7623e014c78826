use livetelemetry::{run_dashboard, DashboardOptions, TelemetryConfig, UiActionController};

// Realtime telemetry dashboard.
//
// Usage:
//   cargo run --example dashboard -- [path/to/config.yaml]
//
// Without a path the built-in defaults are used (500 ms ticks, 60 s window).
// Set RUST_LOG=info to see control actions in the terminal.

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match TelemetryConfig::load(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("[dashboard] Failed to load {path}: {e}. Using defaults.");
                TelemetryConfig::default()
            }
        },
        None => TelemetryConfig::default(),
    };

    // Report every applied action from a background thread
    let controller = UiActionController::new();
    let events = controller.subscribe();
    std::thread::spawn(move || {
        while let Ok(ev) = events.recv() {
            eprintln!("[dashboard] {ev:?}");
        }
    });

    let options = DashboardOptions {
        ui_action_controller: Some(controller),
        ..Default::default()
    };
    run_dashboard(config, options)
}

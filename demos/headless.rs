use std::sync::Arc;
use std::time::Duration;

use livetelemetry::{spawn_session, SystemClock, TelemetryConfig, TelemetrySession};

// Headless session driven by a tokio task.
//
// Collects a few seconds of samples, pauses briefly, shrinks the window and
// prints the exported CSV to stdout.
//
// Usage:
//   RUST_LOG=debug cargo run --example headless

#[tokio::main]
async fn main() -> livetelemetry::Result<()> {
    env_logger::init();

    let config = TelemetryConfig {
        tick_interval_ms: 200,
        window_secs: 5,
        ..Default::default()
    };
    let period = Duration::from_millis(config.tick_interval_ms);
    let session = TelemetrySession::with_clock(&config, Arc::new(SystemClock))?;
    let (handle, task) = spawn_session(session, period);

    tokio::time::sleep(Duration::from_secs(3)).await;
    let state = handle.toggle_pause().await?;
    eprintln!("[headless] {state:?} with {} samples", handle.snapshot().await?.len());

    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.toggle_pause().await?;
    tokio::time::sleep(Duration::from_secs(3)).await;

    let evicted = handle.set_window_duration(2).await?;
    eprintln!("[headless] window set to 2s, evicted {evicted}");

    let preview = handle.downsampled_series(8).await?;
    eprintln!("[headless] preview: {preview:?}");

    let csv = handle.export_csv().await?;
    println!("{}", String::from_utf8_lossy(&csv));

    handle.shutdown().await?;
    if let Ok(session) = task.await {
        eprintln!("[headless] stopped={} retained={}", session.is_stopped(), session.len());
    }
    Ok(())
}

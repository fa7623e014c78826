mod common;

use std::sync::Arc;

use common::{config, run_ticks, session, timestamps, TICK_MS};
use livetelemetry::{
    ControllerEvent, ManualClock, RunState, Sample, TelemetryError, TelemetrySession,
    UiActionController,
};

#[test]
fn paused_interval_has_no_samples() {
    let (mut s, clock) = session(60);
    run_ticks(&mut s, &clock, 10);
    assert_eq!(s.toggle_pause(), RunState::Paused);
    run_ticks(&mut s, &clock, 5);
    assert_eq!(s.len(), 10);

    // Resume half-way through a period: nothing is emitted until the next boundary.
    clock.advance(TICK_MS / 2);
    assert_eq!(s.toggle_pause(), RunState::Running);
    assert_eq!(s.poll(), 0);
    clock.advance(TICK_MS / 2);
    assert_eq!(s.poll(), 1);

    let ts = timestamps(&s);
    assert!(ts.iter().all(|&t| t <= 10_000 || t >= 16_000));
    assert_eq!(ts.last(), Some(&16_000));
}

#[test]
fn long_pause_does_not_replay_missed_ticks() {
    let (mut s, clock) = session(600);
    run_ticks(&mut s, &clock, 3);
    s.pause();
    clock.advance(120 * TICK_MS);
    s.poll();
    s.resume();
    run_ticks(&mut s, &clock, 1);
    assert_eq!(s.len(), 4);
}

#[test]
fn rejected_window_leaves_the_stream_running() {
    let (mut s, clock) = session(60);
    run_ticks(&mut s, &clock, 20);

    let err = s.set_window_duration(0).unwrap_err();
    assert!(matches!(err, TelemetryError::InvalidArgument { .. }));
    assert_eq!(s.window_secs(), 60);
    assert_eq!(s.len(), 20);
    assert_eq!(s.run_state(), RunState::Running);

    run_ticks(&mut s, &clock, 5);
    assert_eq!(s.len(), 25);
}

#[test]
fn invalid_config_is_rejected() {
    let clock = Arc::new(ManualClock::new(0));
    let mut cfg = config(60);
    cfg.tick_interval_ms = 0;
    assert!(TelemetrySession::with_clock(&cfg, clock.clone())
        .unwrap_err()
        .is_invalid_argument());

    let cfg = config(0);
    assert!(TelemetrySession::with_clock(&cfg, clock)
        .unwrap_err()
        .is_invalid_argument());
}

#[test]
fn downsampled_series_respects_budget() {
    let (mut s, clock) = session(60);
    run_ticks(&mut s, &clock, 60);
    assert_eq!(s.downsampled_series(240).unwrap().len(), 60);
    let pts = s.downsampled_series(7).unwrap();
    assert!(pts.len() <= 7);
    assert_eq!(pts[0], s.snapshot()[0]);
    assert!(s.downsampled_series(0).unwrap_err().is_invalid_argument());
}

#[test]
fn stop_halts_appends_but_keeps_data_readable() {
    let (mut s, clock) = session(60);
    let sink = s.attach_sink();
    run_ticks(&mut s, &clock, 5);
    s.stop();
    assert!(s.is_stopped());

    run_ticks(&mut s, &clock, 5);
    assert!(s.tick().is_none());
    assert_eq!(s.len(), 5);
    assert!(sink.send_value(99_000, 1.0).is_err());
    assert_eq!(s.export_csv().split(|&b| b == b'\n').count(), 6);
}

#[test]
fn restart_schedules_a_fresh_producer() {
    let (mut s, clock) = session(60);
    run_ticks(&mut s, &clock, 3);
    s.pause();
    s.stop();

    s.restart_producer();
    assert!(!s.is_stopped());
    assert_eq!(s.run_state(), RunState::Running);
    run_ticks(&mut s, &clock, 3);
    assert_eq!(s.len(), 6);
}

#[test]
fn restart_with_custom_waveform() {
    let (mut s, clock) = session(60);
    s.restart_producer_with(Box::new(|t: i64| t as f64 / 1000.0));
    run_ticks(&mut s, &clock, 4);
    let values: Vec<f64> = s.snapshot().iter().map(|x| x.value).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn external_feed_is_drained_on_poll() {
    let (mut s, _clock) = session(60);
    let sink = s.attach_sink();
    sink.send_value(300, 3.0).unwrap();
    sink.send_value(100, 1.0).unwrap();
    sink.send_value(200, 2.0).unwrap();
    assert_eq!(s.poll(), 3);
    assert_eq!(timestamps(&s), vec![100, 200, 300]);

    s.pause();
    sink.send_value(400, 4.0).unwrap();
    assert_eq!(s.drain_sink(), 0);
    s.resume();
    assert_eq!(s.drain_sink(), 0);
    assert_eq!(s.len(), 3);

    s.detach_sink();
    assert!(sink.send_value(500, 5.0).is_err());
}

#[test]
fn feed_pushed_while_paused_is_dropped_on_resume() {
    let (mut s, clock) = session(60);
    let sink = s.attach_sink();
    clock.set(10_000);
    s.pause();
    sink.send_value(12_000, 7.0).unwrap();
    clock.set(14_000);
    s.resume();
    assert_eq!(s.poll(), 0);
    assert!(timestamps(&s).iter().all(|&t| !(10_000..14_000).contains(&t)));
    assert!(s.is_empty());
}

#[test]
fn feed_pushed_while_running_survives_pause() {
    let (mut s, clock) = session(60);
    let sink = s.attach_sink();
    sink.send_value(500, 5.0).unwrap();
    s.pause();
    s.poll();
    clock.advance(TICK_MS / 2);
    s.resume();
    s.poll();
    assert_eq!(timestamps(&s), vec![500]);
}

#[test]
fn feed_accepts_batches() {
    let (mut s, _clock) = session(60);
    let sink = s.attach_sink();
    sink.send_all((1..=4).map(|i| Sample::new(i * 100, i as f64))).unwrap();
    assert_eq!(s.drain_sink(), 4);
    assert_eq!(timestamps(&s), vec![100, 200, 300, 400]);

    s.stop();
    assert!(sink.send_all([Sample::new(500, 5.0)]).is_err());
}

#[test]
fn controller_requests_apply_in_order() {
    let (mut s, clock) = session(60);
    run_ticks(&mut s, &clock, 90);

    let ctrl = UiActionController::new();
    let events = ctrl.subscribe();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    ctrl.pause();
    ctrl.request_window_secs(30);
    ctrl.request_save_csv_to_path(&path);
    assert_eq!(ctrl.apply_requests(&mut s), 3);

    let got: Vec<ControllerEvent> = events.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControllerEvent::Paused,
            ControllerEvent::WindowChanged {
                secs: 30,
                evicted: 30
            },
            ControllerEvent::Exported {
                path: path.clone(),
                samples: 30
            },
        ]
    );
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 31);

    // Nothing pending: nothing applied, nothing broadcast.
    assert_eq!(ctrl.apply_requests(&mut s), 0);
    assert!(events.try_recv().is_err());
}

#[test]
fn controller_reports_rejections() {
    let (mut s, _clock) = session(60);
    let ctrl = UiActionController::new();
    let events = ctrl.subscribe();

    ctrl.request_window_secs(0);
    ctrl.toggle_pause();
    ctrl.apply_requests(&mut s);

    assert_eq!(events.try_recv().unwrap(), ControllerEvent::Paused);
    assert!(matches!(
        events.try_recv().unwrap(),
        ControllerEvent::WindowRejected { secs: 0, .. }
    ));
    assert_eq!(s.window_secs(), 60);
}

#[test]
fn double_toggle_request_cancels_out() {
    let (mut s, _clock) = session(60);
    let ctrl = UiActionController::new();
    ctrl.toggle_pause();
    ctrl.toggle_pause();
    assert_eq!(ctrl.apply_requests(&mut s), 0);
    assert_eq!(s.run_state(), RunState::Running);
}

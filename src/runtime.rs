//! Async actor that owns a [`TelemetrySession`].
//!
//! The spawned task is the only code touching the session. A tokio interval
//! drives the producer; every other operation arrives as a
//! [`TelemetryCommand`] and is answered over a oneshot channel, so appends,
//! evictions, control actions and snapshots never interleave.

use std::ops::ControlFlow;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::controls::RunState;
use crate::data::sample::{Sample, Snapshot};
use crate::error::{Result, TelemetryError};
use crate::session::TelemetrySession;

const COMMAND_QUEUE: usize = 64;

/// Messages understood by the session task.
pub enum TelemetryCommand {
    TogglePause {
        reply: oneshot::Sender<RunState>,
    },
    SetWindowDuration {
        secs: u64,
        reply: oneshot::Sender<Result<usize>>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
    Downsampled {
        max_points: usize,
        reply: oneshot::Sender<Result<Vec<Sample>>>,
    },
    ExportCsv {
        reply: oneshot::Sender<Vec<u8>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle to a spawned session task.
#[derive(Clone, Debug)]
pub struct TelemetryHandle {
    tx: mpsc::Sender<TelemetryCommand>,
}

/// Spawn `session` on the current tokio runtime, ticking every `period`.
///
/// The first tick fires one period after spawning. Missed ticks are skipped.
/// The join handle yields the stopped session once the task ends.
pub fn spawn_session(
    session: TelemetrySession,
    period: Duration,
) -> (TelemetryHandle, JoinHandle<TelemetrySession>) {
    let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
    let task = tokio::spawn(run_session(session, period, rx));
    (TelemetryHandle { tx }, task)
}

async fn run_session(
    mut session: TelemetrySession,
    period: Duration,
    mut rx: mpsc::Receiver<TelemetryCommand>,
) -> TelemetrySession {
    let period = period.max(Duration::from_millis(1));
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!("session task started, tick every {period:?}");

    loop {
        tokio::select! {
            biased;
            cmd = rx.recv() => {
                let Some(cmd) = cmd else {
                    session.stop();
                    break;
                };
                if handle_command(&mut session, cmd).is_break() {
                    break;
                }
            }
            _ = interval.tick() => {
                session.drain_sink();
                if let Some(s) = session.tick() {
                    debug!("tick appended t={}", s.timestamp_ms);
                }
            }
        }
    }
    info!("session task finished with {} samples retained", session.len());
    session
}

/// Apply one command. `Break` means the task must end.
fn handle_command(session: &mut TelemetrySession, cmd: TelemetryCommand) -> ControlFlow<()> {
    // A dropped reply receiver just means the caller stopped waiting.
    match cmd {
        TelemetryCommand::TogglePause { reply } => {
            let _ = reply.send(session.toggle_pause());
        }
        TelemetryCommand::SetWindowDuration { secs, reply } => {
            let _ = reply.send(session.set_window_duration(secs));
        }
        TelemetryCommand::Snapshot { reply } => {
            let _ = reply.send(session.snapshot());
        }
        TelemetryCommand::Downsampled { max_points, reply } => {
            let _ = reply.send(session.downsampled_series(max_points));
        }
        TelemetryCommand::ExportCsv { reply } => {
            let _ = reply.send(session.export_csv());
        }
        TelemetryCommand::Shutdown { reply } => {
            session.stop();
            let _ = reply.send(());
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}

impl TelemetryHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> TelemetryCommand,
    ) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| TelemetryError::SessionClosed)?;
        rx.await.map_err(|_| TelemetryError::SessionClosed)
    }

    pub async fn toggle_pause(&self) -> Result<RunState> {
        self.request(|reply| TelemetryCommand::TogglePause { reply })
            .await
    }

    pub async fn set_window_duration(&self, secs: u64) -> Result<usize> {
        self.request(|reply| TelemetryCommand::SetWindowDuration { secs, reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.request(|reply| TelemetryCommand::Snapshot { reply })
            .await
    }

    pub async fn downsampled_series(&self, max_points: usize) -> Result<Vec<Sample>> {
        self.request(|reply| TelemetryCommand::Downsampled { max_points, reply })
            .await?
    }

    pub async fn export_csv(&self) -> Result<Vec<u8>> {
        self.request(|reply| TelemetryCommand::ExportCsv { reply })
            .await
    }

    /// Stop the producer and end the task. Later calls fail with `SessionClosed`.
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| TelemetryCommand::Shutdown { reply })
            .await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

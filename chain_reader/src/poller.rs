// poller.rs - Background refresh loop
//
// One tokio task owns the GameSource. It fetches on start, then on every tick
// of the poll interval and whenever the UI asks. The latest outcome is
// published through a watch channel so the render loop never waits on I/O.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

pub use crate::reader::Snapshot;
use crate::reader::GameSource;

#[derive(Debug, Clone, Default)]
pub struct PollStatus {
    pub snapshot: Option<Arc<Snapshot>>,
    pub loading: bool,    // no attempt has completed yet
    pub refreshing: bool, // a fetch is in flight
    pub last_error: Option<String>,
    pub refreshes: u64, // completed attempts, successful or not
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCommand {
    Refresh,
    Shutdown,
}

/// UI side of the poller. Dropping it stops the task.
pub struct PollerHandle {
    status: watch::Receiver<PollStatus>,
    commands: mpsc::Sender<PollCommand>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn status(&self) -> PollStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollStatus> {
        self.status.clone()
    }

    /// Queues a refresh; false when the queue is full or the task is gone.
    pub fn request_refresh(&self) -> bool {
        self.commands.try_send(PollCommand::Refresh).is_ok()
    }

    pub fn shutdown(&self) {
        let _ = self.commands.try_send(PollCommand::Shutdown);
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn spawn_poller<S>(runtime: &Handle, source: S, interval: Duration) -> PollerHandle
where
    S: GameSource + 'static,
{
    let (status_tx, status_rx) = watch::channel(PollStatus { loading: true, ..PollStatus::default() });
    let (command_tx, command_rx) = mpsc::channel(8);
    let task = runtime.spawn(run_poller(source, interval, status_tx, command_rx));
    PollerHandle { status: status_rx, commands: command_tx, task }
}

async fn run_poller<S: GameSource>(
    source: S,
    interval: Duration,
    status: watch::Sender<PollStatus>,
    mut commands: mpsc::Receiver<PollCommand>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval_secs = interval.as_secs(), "poller started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            command = commands.recv() => match command {
                Some(PollCommand::Refresh) => ticker.reset(),
                Some(PollCommand::Shutdown) | None => break,
            },
        }

        // Requests that piled up while the last fetch ran are served by this one
        let mut shutdown = false;
        while let Ok(command) = commands.try_recv() {
            shutdown |= command == PollCommand::Shutdown;
        }
        if shutdown {
            break;
        }

        refresh_once(&source, &status).await;
    }
    info!("poller stopped");
}

async fn refresh_once<S: GameSource>(source: &S, status: &watch::Sender<PollStatus>) {
    status.send_modify(|s| s.refreshing = true);
    let started = Instant::now();
    let result = source.fetch_snapshot().await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    status.send_modify(|s| {
        s.loading = false;
        s.refreshing = false;
        s.refreshes += 1;
        match result {
            Ok(snapshot) => {
                info!(
                    game_id = snapshot.state.game_id,
                    agents = snapshot.occupancy.len(),
                    elapsed_ms,
                    "refreshed game state"
                );
                s.snapshot = Some(Arc::new(snapshot));
                s.last_error = None;
            }
            Err(err) => {
                warn!(error = %err, elapsed_ms, "refresh failed, keeping previous snapshot");
                s.last_error = Some(err.to_string());
            }
        }
    });
}

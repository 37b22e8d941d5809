use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::warn;

use kontos_events::{CommitNotice, NoticeBus, Subscription};

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Drains commit notices off the bus and applies an idempotent handler.
///
/// Handler failures are logged and swallowed: projection health must never
/// reach back into the write path. The next notice for the same account
/// re-derives whatever a failed run missed.
#[derive(Debug)]
pub struct ProjectionWorker;

impl ProjectionWorker {
    /// Spawn a worker thread processing notices from a bus subscription.
    ///
    /// `tick` bounds how long a shutdown request can go unnoticed while the
    /// bus is idle. `handler` must be idempotent (at-least-once delivery).
    pub fn spawn<B, H, E>(
        name: &'static str,
        bus: B,
        tick: Duration,
        mut handler: H,
    ) -> WorkerHandle
    where
        B: NoticeBus<CommitNotice> + Send + Sync + 'static,
        H: FnMut(CommitNotice) -> Result<(), E> + Send + 'static,
        E: core::fmt::Debug + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let sub: Subscription<CommitNotice> = bus.subscribe();

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, sub, shutdown_rx, tick, &mut handler))
            .expect("failed to spawn projection worker thread");

        WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        }
    }
}

fn worker_loop<H, E>(
    name: &'static str,
    sub: Subscription<CommitNotice>,
    shutdown_rx: mpsc::Receiver<()>,
    tick: Duration,
    handler: &mut H,
) where
    H: FnMut(CommitNotice) -> Result<(), E>,
    E: core::fmt::Debug,
{
    loop {
        // Shutdown check (non-blocking)
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(notice) => {
                if let Err(err) = handler(notice) {
                    warn!(worker = name, error = ?err, "projection handler failed");
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}

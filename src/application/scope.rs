use std::future::{self, Future};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Owns every timer and waiter belonging to one mounted stage.
///
/// Cancelling the scope, explicitly or by dropping it, stops all of them
/// together. Work spawned outside the scope (the callback request) is not
/// affected.
pub struct StageScope {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Default for StageScope {
    fn default() -> Self {
        Self::new()
    }
}

impl StageScope {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            shutdown,
            tasks: Vec::new(),
        }
    }

    /// Runs `on_tick` every `period`, first after one full period, until it
    /// breaks or the scope is cancelled.
    pub fn spawn_periodic<F>(&mut self, period: Duration, on_tick: F)
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        self.spawn_ticker(period, None, on_tick);
    }

    /// Like [`StageScope::spawn_periodic`], but every notification on
    /// `restart` pushes the next tick one full period away from that moment.
    ///
    /// A restart and a tick due at the same instant resolve in favour of the
    /// restart.
    pub fn spawn_restartable<F>(&mut self, period: Duration, restart: Arc<Notify>, on_tick: F)
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        self.spawn_ticker(period, Some(restart), on_tick);
    }

    fn spawn_ticker<F>(&mut self, period: Duration, restart: Option<Arc<Notify>>, mut on_tick: F)
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let period = period.max(Duration::from_micros(1));
        let mut shutdown_rx = self.shutdown.subscribe();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled(&mut shutdown_rx) => break,
                    _ = restarted(restart.as_deref()) => interval.reset(),
                    _ = interval.tick() => {
                        if on_tick().is_break() {
                            break;
                        }
                    }
                }
            }
        });
        self.tasks.push(handle);
    }

    /// Runs `task` until it completes or the scope is cancelled.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut shutdown_rx = self.shutdown.subscribe();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task => {}
                _ = cancelled(&mut shutdown_rx) => {}
            }
        });
        self.tasks.push(handle);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Stops every task in the scope. Idempotent.
    pub fn cancel(&mut self) {
        self.shutdown.send_replace(true);
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

async fn cancelled(shutdown_rx: &mut watch::Receiver<bool>) {
    // A dropped sender also counts as cancellation.
    let _ = shutdown_rx.wait_for(|cancelled| *cancelled).await;
}

async fn restarted(restart: Option<&Notify>) {
    match restart {
        Some(restart) => restart.notified().await,
        None => future::pending().await,
    }
}

impl Drop for StageScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::traits::FundDataSource;
use crate::errors::CoreError;
use crate::services::watchlist_service::WatchlistStore;

/// Default quiescence interval between refresh cycles.
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_secs(15);

/// Periodic re-fetch policy for the watchlist.
///
/// Contract:
/// - While the watchlist is non-empty: wait out the quiescence interval,
///   fetch detail for every watched fund concurrently, then merge the
///   results into the store in one atomic step.
/// - The next interval starts only after the current cycle's merge has
///   been applied ("reschedule after completion"). Cycles are therefore
///   strictly sequential: a slow backend stretches the cadence instead of
///   piling up overlapping fan-outs.
/// - A failed fetch for one fund leaves that entry stale and untouched;
///   the rest of the cycle proceeds.
/// - When the watchlist is empty the timer stops entirely; the store wakes
///   the loop as soon as a fund is added, and the next cycle runs one
///   quiescence interval later.
/// - Shutdown is structural: the in-flight cycle is raced against the stop
///   signal, so a torn-down cycle can never apply its merge.
pub struct WatchlistRefresher {
    store: Arc<WatchlistStore>,
    source: Arc<dyn FundDataSource>,
    quiescence: Duration,
}

impl WatchlistRefresher {
    pub fn new(store: Arc<WatchlistStore>, source: Arc<dyn FundDataSource>) -> Self {
        Self {
            store,
            source,
            quiescence: DEFAULT_QUIESCENCE,
        }
    }

    pub fn with_quiescence(mut self, quiescence: Duration) -> Self {
        self.quiescence = quiescence;
        self
    }

    /// Run one fan-out/merge cycle against the current watchlist.
    ///
    /// Fetches every watched fund concurrently, drops per-fund failures
    /// with a logged warning, and merges the successes keyed by id — only
    /// into entries still present at merge time. Returns the number of
    /// entries updated.
    pub async fn run_cycle(&self) -> Result<usize, CoreError> {
        let ids = self.store.watched_ids();
        if ids.is_empty() {
            return Ok(0);
        }

        let fetches = ids.into_iter().map(|id| {
            let source = Arc::clone(&self.source);
            async move {
                let result = source.fund_detail(&id).await;
                (id, result)
            }
        });
        let settled = join_all(fetches).await;

        let mut updates = HashMap::new();
        for (id, result) in settled {
            match result {
                Ok(detail) => {
                    updates.insert(id, detail);
                }
                Err(e) => {
                    warn!("Refresh fetch for fund {id} failed, keeping stale entry: {e}");
                }
            }
        }

        let applied = self.store.apply_updates(&updates)?;
        debug!("Refresh cycle applied {applied} update(s)");
        Ok(applied)
    }

    /// Start the refresh loop on the current runtime.
    pub fn spawn(self) -> RefresherHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(stop_rx));
        RefresherHandle {
            stop: stop_tx,
            task,
        }
    }

    async fn run(self, mut stop: watch::Receiver<bool>) {
        loop {
            // Idle with the timer stopped while the watchlist is empty.
            // The wakeup future must be registered before the emptiness
            // check, or an add landing in between would be missed.
            loop {
                let grew = self.store.grew();
                if !self.store.is_empty() {
                    break;
                }
                debug!("Watchlist empty, refresh timer stopped");
                tokio::select! {
                    res = stop.changed() => {
                        if res.is_err() || *stop.borrow() {
                            return;
                        }
                    }
                    () = grew => {}
                }
            }

            // Quiescence is measured from the completion of the previous
            // cycle, not from a fixed wall-clock grid.
            tokio::select! {
                res = stop.changed() => {
                    if res.is_err() || *stop.borrow() {
                        return;
                    }
                    continue;
                }
                () = tokio::time::sleep(self.quiescence) => {}
            }

            // Race the cycle against the stop signal: results of a cycle
            // that loses this race are dropped, never merged.
            tokio::select! {
                res = stop.changed() => {
                    if res.is_err() || *stop.borrow() {
                        return;
                    }
                }
                result = self.run_cycle() => {
                    if let Err(e) = result {
                        warn!("Refresh cycle skipped: {e}");
                    }
                }
            }
        }
    }
}

/// Handle to a spawned refresh loop. Dropping the handle does NOT stop the
/// loop; call [`RefresherHandle::shutdown`] at teardown.
pub struct RefresherHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefresherHandle {
    /// Signal the loop to stop without waiting for it to wind down.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    /// Stop the loop and wait for it to exit. After this returns, no
    /// further cycle results will be applied to the store.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

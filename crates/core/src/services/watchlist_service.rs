use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::futures::Notified;
use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::fund::{FundDetail, WatchedFund};
use crate::models::watchlist::Watchlist;
use crate::storage::backend::StorageBackend;
use crate::storage::manager::StorageManager;

/// Owned watchlist store: the single place where the list is mutated.
///
/// Every mutating operation performs the in-memory change and the
/// durable-write side effect while holding the store lock, so user actions
/// (add/remove) and the refresh cycle's merge serialize against each other
/// and the persisted blob never lags behind by more than a failed write.
///
/// Durability is best-effort in both directions: a corrupt blob at startup
/// falls back to an empty list, and a failed write is logged without
/// rolling back the in-memory mutation.
pub struct WatchlistStore {
    list: Mutex<Watchlist>,
    backend: Box<dyn StorageBackend>,
    /// Wakes the refresher when the list grows from empty.
    growth: Notify,
}

impl WatchlistStore {
    /// Open the store, rehydrating from the backend best-effort.
    pub fn open(backend: Box<dyn StorageBackend>) -> Self {
        let list = StorageManager::load_or_empty(backend.as_ref());
        debug!("Watchlist store opened with {} entries", list.len());
        Self {
            list: Mutex::new(list),
            backend,
            growth: Notify::new(),
        }
    }

    /// Add a fund. Idempotent by id: returns `false` (and does not touch
    /// storage) when the fund is already watched.
    pub fn add(&self, fund: WatchedFund) -> Result<bool, CoreError> {
        let was_empty;
        {
            let mut list = self.lock()?;
            was_empty = list.is_empty();
            if !list.add(fund) {
                return Ok(false);
            }
            self.persist(&list);
        }
        if was_empty {
            // Restart the refresher's timer now that there is work again.
            self.growth.notify_waiters();
        }
        Ok(true)
    }

    /// Remove a fund by id. Returns `false` if it was not on the list.
    pub fn remove(&self, id: &str) -> Result<bool, CoreError> {
        let mut list = self.lock()?;
        if list.remove(id).is_none() {
            return Ok(false);
        }
        self.persist(&list);
        Ok(true)
    }

    /// Replace the whole list. Duplicate ids are dropped (first wins).
    pub fn replace_all(&self, funds: Vec<WatchedFund>) -> Result<(), CoreError> {
        let grew;
        {
            let mut list = self.lock()?;
            let was_empty = list.is_empty();
            *list = Watchlist::from(funds);
            grew = was_empty && !list.is_empty();
            self.persist(&list);
        }
        if grew {
            self.growth.notify_waiters();
        }
        Ok(())
    }

    /// Merge fetched snapshots into the list, keyed by fund id.
    ///
    /// Only ids still present at merge time are touched: a remove that
    /// happened while the fetches were in flight is never undone, and an
    /// entry without an update keeps its previous field values exactly.
    /// Returns the number of entries updated.
    pub fn apply_updates(
        &self,
        updates: &HashMap<String, FundDetail>,
    ) -> Result<usize, CoreError> {
        let mut list = self.lock()?;
        let applied = list.merge_updates(updates);
        if applied > 0 {
            self.persist(&list);
        }
        Ok(applied)
    }

    /// A point-in-time copy of the current list.
    pub fn snapshot(&self) -> Watchlist {
        self.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Fund codes currently watched, in display order.
    pub fn watched_ids(&self) -> Vec<String> {
        self.lock().map(|l| l.ids()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Future that resolves the next time the list grows from empty.
    /// Register it BEFORE checking `is_empty` to avoid a missed wakeup.
    pub fn grew(&self) -> Notified<'_> {
        self.growth.notified()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Watchlist>, CoreError> {
        self.list
            .lock()
            .map_err(|_| CoreError::FileIO("Watchlist store lock poisoned".into()))
    }

    /// Write-through while holding the lock. Failures are logged and
    /// swallowed; the in-memory state stays authoritative.
    fn persist(&self, list: &Watchlist) {
        if let Err(e) = StorageManager::save(self.backend.as_ref(), list) {
            warn!("Failed to persist watchlist: {e}");
        }
    }
}

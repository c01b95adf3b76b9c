use tracing::warn;

use crate::errors::CoreError;
use crate::models::watchlist::Watchlist;

use super::backend::StorageBackend;
use super::format;

/// High-level storage operations: save/load the watchlist through a backend.
pub struct StorageManager;

impl StorageManager {
    /// Serialize and write the watchlist.
    ///
    /// Flow: Watchlist → versioned JSON envelope → backend blob
    pub fn save(backend: &dyn StorageBackend, watchlist: &Watchlist) -> Result<(), CoreError> {
        let blob = format::encode(watchlist)?;
        backend.write(&blob)
    }

    /// Read and deserialize the watchlist. Strict variant: propagates
    /// corruption and version errors. A missing blob yields an empty list.
    pub fn load(backend: &dyn StorageBackend) -> Result<Watchlist, CoreError> {
        match backend.read()? {
            Some(blob) => format::decode(&blob),
            None => Ok(Watchlist::new()),
        }
    }

    /// Best-effort startup load: a corrupt, unreadable, or missing blob
    /// yields an empty watchlist with a logged warning, never an error.
    /// The worst outcome of broken storage is an empty list.
    pub fn load_or_empty(backend: &dyn StorageBackend) -> Watchlist {
        match Self::load(backend) {
            Ok(list) => list,
            Err(e) => {
                warn!("Failed to load stored watchlist, starting empty: {e}");
                Watchlist::new()
            }
        }
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::fund::{FundDetail, WatchedFund};

/// The user's watchlist: an ordered sequence of watched funds, unique by
/// fund code. Insertion order defines display order.
///
/// This type is pure in-memory state. Durable persistence and the
/// concurrency seams live in `services::watchlist_service::WatchlistStore`;
/// everything here is synchronous and side-effect free, which keeps the
/// invariants (no duplicate ids, order preserved) trivially testable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist {
    funds: Vec<WatchedFund>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fund to the end of the list.
    ///
    /// Idempotent by identifier: if an entry with the same id already
    /// exists, the list is unchanged and `false` is returned. The existing
    /// entry is NOT overwritten — re-adding never clobbers fresher data.
    pub fn add(&mut self, fund: WatchedFund) -> bool {
        if self.contains(&fund.id) {
            return false;
        }
        self.funds.push(fund);
        true
    }

    /// Remove a fund by id. Returns the removed entry, preserving the
    /// relative order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<WatchedFund> {
        let idx = self.funds.iter().position(|f| f.id == id)?;
        Some(self.funds.remove(idx))
    }

    /// Overlay fetched snapshots onto the list, keyed by fund id.
    ///
    /// Only entries still present in the list are touched; updates for ids
    /// that have been removed in the meantime are dropped on the floor, and
    /// entries without an update keep their previous field values exactly.
    /// Never adds or removes entries. Returns the number of entries updated.
    pub fn merge_updates(&mut self, updates: &HashMap<String, FundDetail>) -> usize {
        let mut applied = 0;
        for fund in &mut self.funds {
            if let Some(detail) = updates.get(&fund.id) {
                fund.apply(detail);
                applied += 1;
            }
        }
        applied
    }

    pub fn contains(&self, id: &str) -> bool {
        self.funds.iter().any(|f| f.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&WatchedFund> {
        self.funds.iter().find(|f| f.id == id)
    }

    /// Fund codes in display order.
    pub fn ids(&self) -> Vec<String> {
        self.funds.iter().map(|f| f.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchedFund> {
        self.funds.iter()
    }

    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }
}

impl From<Vec<WatchedFund>> for Watchlist {
    /// Build a watchlist from raw entries, dropping duplicate ids
    /// (first occurrence wins). Used when rehydrating from storage,
    /// where the blob may predate the uniqueness invariant.
    fn from(entries: Vec<WatchedFund>) -> Self {
        let mut list = Self::new();
        for fund in entries {
            list.add(fund);
        }
        list
    }
}

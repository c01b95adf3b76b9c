pub mod client;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use client::account_api::AccountClient;
use client::fund_api::FundApiClient;
use client::traits::FundDataSource;
use errors::CoreError;
use models::account::{Account, AccountRequest};
use models::fund::{FundDetail, FundMeta, NavPoint, WatchedFund};
use models::settings::ClientConfig;
use models::subscription::SubscriptionPreference;
use models::watchlist::Watchlist;
use services::refresher::{RefresherHandle, WatchlistRefresher};
use services::watchlist_service::WatchlistStore;
#[cfg(not(target_arch = "wasm32"))]
use storage::backend::FileBackend;
use storage::backend::{MemoryBackend, StorageBackend};

/// Main entry point for the FundWatch core library.
/// Owns the watchlist store and the clients for the fund-data and
/// account backends; any frontend drives it through these methods.
#[must_use]
pub struct FundTracker {
    config: ClientConfig,
    store: Arc<WatchlistStore>,
    source: Arc<dyn FundDataSource>,
    accounts: AccountClient,
}

impl std::fmt::Debug for FundTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundTracker")
            .field("api_base_url", &self.config.api_base_url)
            .field("watched", &self.store.len())
            .finish()
    }
}

impl FundTracker {
    /// Open a tracker with file-backed persistence (native hosts).
    /// The stored watchlist is rehydrated best-effort: corrupt or missing
    /// storage yields an empty list, never an error.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(config: ClientConfig) -> Self {
        let backend = Box::new(FileBackend::new(config.storage_path.clone()));
        Self::build(config, None, backend)
    }

    /// Open a tracker without durable persistence. Useful for tests and
    /// for hosts that bridge storage themselves.
    pub fn open_in_memory(config: ClientConfig) -> Self {
        Self::build(config, None, Box::new(MemoryBackend::new()))
    }

    /// Open a tracker with an explicit data source and storage backend.
    /// This is the seam used by integration tests (mock source, memory
    /// backend) and by embedders with custom transports.
    pub fn open_with(
        config: ClientConfig,
        source: Arc<dyn FundDataSource>,
        backend: Box<dyn StorageBackend>,
    ) -> Self {
        Self::build(config, Some(source), backend)
    }

    // ── Search & Watchlist ──────────────────────────────────────────

    /// Search funds by code or name fragment.
    pub async fn search_funds(&self, query: &str) -> Result<Vec<FundMeta>, CoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::ValidationError(
                "Search query must not be empty".into(),
            ));
        }
        self.source.search(query).await
    }

    /// Search for a fund and add the first match to the watchlist.
    ///
    /// The entry is only created after a successful detail fetch (and is
    /// marked trusted); a search miss or a detail failure leaves the
    /// watchlist untouched. Adding a fund that is already watched is a
    /// no-op returning the existing entry.
    pub async fn add_fund(&self, query: &str) -> Result<WatchedFund, CoreError> {
        let matches = self.search_funds(query).await?;
        let meta = matches
            .first()
            .ok_or_else(|| CoreError::FundNotFound(query.trim().to_string()))?;
        self.add_fund_by_id(&meta.id).await
    }

    /// Add a fund by its exact code, skipping the search hop.
    pub async fn add_fund_by_id(&self, fund_id: &str) -> Result<WatchedFund, CoreError> {
        let snapshot = self.store.snapshot();
        if let Some(existing) = snapshot.get(fund_id) {
            return Ok(existing.clone());
        }

        let detail = self.source.fund_detail(fund_id).await?;
        let fund = WatchedFund::from_detail(&detail);
        // A concurrent add may have won the race; either way the entry
        // now on the list is what we report back.
        self.store.add(fund.clone())?;
        Ok(self
            .store
            .snapshot()
            .get(fund_id)
            .cloned()
            .unwrap_or(fund))
    }

    /// Remove a fund from the watchlist. Returns `false` if it was not
    /// watched.
    pub fn remove_fund(&self, fund_id: &str) -> Result<bool, CoreError> {
        self.store.remove(fund_id)
    }

    /// A point-in-time copy of the watchlist.
    #[must_use]
    pub fn watchlist(&self) -> Watchlist {
        self.store.snapshot()
    }

    #[must_use]
    pub fn is_watching(&self, fund_id: &str) -> bool {
        self.store.snapshot().contains(fund_id)
    }

    #[must_use]
    pub fn watched_count(&self) -> usize {
        self.store.len()
    }

    // ── Detail, History & Alerts ────────────────────────────────────

    /// Fresh valuation snapshot with top holdings, for the detail view.
    pub async fn fund_detail(&self, fund_id: &str) -> Result<FundDetail, CoreError> {
        self.source.fund_detail(fund_id).await
    }

    /// Historical NAV series, ordered by date ascending.
    pub async fn fund_history(&self, fund_id: &str) -> Result<Vec<NavPoint>, CoreError> {
        self.source.fund_history(fund_id).await
    }

    /// Validate and submit alert preferences for a fund. The client keeps
    /// no subscription state beyond this call.
    pub async fn subscribe(
        &self,
        fund_id: &str,
        prefs: &SubscriptionPreference,
    ) -> Result<(), CoreError> {
        prefs.validate()?;
        self.source.subscribe(fund_id, prefs).await
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Run one refresh cycle imperatively (e.g., a pull-to-refresh
    /// gesture). Returns the number of entries updated.
    pub async fn refresh_now(&self) -> Result<usize, CoreError> {
        self.refresher().run_cycle().await
    }

    /// Start the background refresh loop on the current runtime.
    /// Call [`RefresherHandle::shutdown`] when the owning view goes away.
    pub fn start_refresher(&self) -> RefresherHandle {
        self.refresher().spawn()
    }

    // ── Accounts ────────────────────────────────────────────────────

    pub async fn accounts(&self) -> Result<Vec<Account>, CoreError> {
        self.accounts.list_accounts().await
    }

    pub async fn create_account(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Account, CoreError> {
        self.accounts
            .create_account(&AccountRequest::new(name, description))
            .await
    }

    pub async fn update_account(
        &self,
        id: i64,
        name: &str,
        description: &str,
    ) -> Result<Account, CoreError> {
        self.accounts
            .update_account(id, &AccountRequest::new(name, description))
            .await
    }

    pub async fn delete_account(&self, id: i64) -> Result<(), CoreError> {
        self.accounts.delete_account(id).await
    }

    /// Whether the account backend currently accepts registrations.
    pub async fn registration_enabled(&self) -> Result<bool, CoreError> {
        self.accounts.registration_enabled().await
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(
        config: ClientConfig,
        source: Option<Arc<dyn FundDataSource>>,
        backend: Box<dyn StorageBackend>,
    ) -> Self {
        let source = source.unwrap_or_else(|| {
            Arc::new(FundApiClient::new(
                config.api_base_url.clone(),
                config.request_timeout_secs,
            ))
        });
        let accounts = AccountClient::new(
            config.api_base_url.clone(),
            config.request_timeout_secs,
        );
        let store = Arc::new(WatchlistStore::open(backend));

        Self {
            config,
            store,
            source,
            accounts,
        }
    }

    fn refresher(&self) -> WatchlistRefresher {
        WatchlistRefresher::new(Arc::clone(&self.store), Arc::clone(&self.source))
            .with_quiescence(Duration::from_secs(self.config.quiescence_secs))
    }
}

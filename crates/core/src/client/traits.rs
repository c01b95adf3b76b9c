use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::fund::{FundDetail, FundMeta, NavPoint};
use crate::models::subscription::SubscriptionPreference;

/// Trait abstraction over the external fund-data API.
///
/// The refresher and the facade depend on this seam instead of a concrete
/// HTTP client, so the polling contract can be tested against an in-memory
/// mock and the data provider can be swapped without touching the rest of
/// the codebase.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FundDataSource: Send + Sync {
    /// Search funds by code or name fragment.
    async fn search(&self, query: &str) -> Result<Vec<FundMeta>, CoreError>;

    /// Current intraday valuation snapshot for one fund.
    async fn fund_detail(&self, fund_id: &str) -> Result<FundDetail, CoreError>;

    /// Historical NAV series, ordered by date ascending.
    async fn fund_history(&self, fund_id: &str) -> Result<Vec<NavPoint>, CoreError>;

    /// Register alert preferences for one fund with the alert service.
    async fn subscribe(
        &self,
        fund_id: &str,
        prefs: &SubscriptionPreference,
    ) -> Result<(), CoreError>;
}

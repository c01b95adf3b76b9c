use async_trait::async_trait;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::FundDataSource;
use crate::errors::CoreError;
use crate::models::fund::{FundDetail, FundMeta, NavPoint};
use crate::models::subscription::SubscriptionPreference;

/// HTTP client for the external fund-data API.
///
/// Endpoints (relative to the configured base URL):
/// - `GET  /search?q=<code>`        → fund metadata matches
/// - `GET  /fund/{id}`              → intraday valuation snapshot
/// - `GET  /fund/{id}/history`      → NAV time series
/// - `POST /fund/{id}/subscribe`    → register alert preferences
pub struct FundApiClient {
    client: Client,
    base_url: String,
}

impl FundApiClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response to a `CoreError`, pulling the backend's
    /// `{"detail": ...}` message out of the body when present.
    async fn error_from_response(
        endpoint: &str,
        resp: reqwest::Response,
    ) -> CoreError {
        let status = resp.status().as_u16();

        #[derive(serde::Deserialize)]
        struct ErrorBody {
            detail: String,
        }

        if let Ok(body) = resp.json::<ErrorBody>().await {
            return CoreError::Api {
                endpoint: endpoint.to_string(),
                message: body.detail,
            };
        }
        CoreError::Status {
            endpoint: endpoint.to_string(),
            status,
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FundDataSource for FundApiClient {
    async fn search(&self, query: &str) -> Result<Vec<FundMeta>, CoreError> {
        let resp = self
            .client
            .get(self.url("/search"))
            .query(&[("q", query)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::error_from_response("/search", resp).await);
        }

        resp.json::<Vec<FundMeta>>().await.map_err(|e| CoreError::Api {
            endpoint: "/search".into(),
            message: format!("Failed to parse search results: {e}"),
        })
    }

    async fn fund_detail(&self, fund_id: &str) -> Result<FundDetail, CoreError> {
        let endpoint = format!("/fund/{fund_id}");
        let resp = self.client.get(self.url(&endpoint)).send().await?;

        if resp.status().as_u16() == 404 {
            return Err(CoreError::FundNotFound(fund_id.to_string()));
        }
        if !resp.status().is_success() {
            return Err(Self::error_from_response(&endpoint, resp).await);
        }

        resp.json::<FundDetail>().await.map_err(|e| CoreError::Api {
            endpoint,
            message: format!("Failed to parse detail for fund {fund_id}: {e}"),
        })
    }

    async fn fund_history(&self, fund_id: &str) -> Result<Vec<NavPoint>, CoreError> {
        let endpoint = format!("/fund/{fund_id}/history");
        let resp = self.client.get(self.url(&endpoint)).send().await?;

        if !resp.status().is_success() {
            return Err(Self::error_from_response(&endpoint, resp).await);
        }

        let mut points: Vec<NavPoint> =
            resp.json().await.map_err(|e| CoreError::Api {
                endpoint,
                message: format!("Failed to parse history for fund {fund_id}: {e}"),
            })?;

        // The backend usually returns ascending order already; enforce it
        // so chart consumers can rely on it.
        points.sort_by_key(|p| p.date);
        Ok(points)
    }

    async fn subscribe(
        &self,
        fund_id: &str,
        prefs: &SubscriptionPreference,
    ) -> Result<(), CoreError> {
        let endpoint = format!("/fund/{fund_id}/subscribe");
        let resp = self
            .client
            .post(self.url(&endpoint))
            .json(prefs)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::error_from_response(&endpoint, resp).await);
        }
        Ok(())
    }
}

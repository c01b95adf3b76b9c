use serde::{Deserialize, Serialize};

/// Client configuration. Hosts can deserialize this from their own config
/// file or just use the defaults, which match the reference backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the fund-data / account backend, without trailing slash.
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Refresher quiescence interval: how long to wait after a completed
    /// cycle before starting the next one.
    pub quiescence_secs: u64,

    /// Path of the persisted watchlist blob (native hosts).
    pub storage_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:21345/api".to_string(),
            request_timeout_secs: 30,
            quiescence_secs: 15,
            storage_path: "fundwatch_watchlist.json".to_string(),
        }
    }
}

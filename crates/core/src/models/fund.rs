use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// A single row from the fund search endpoint: just enough metadata
/// to identify a fund before its first detail fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundMeta {
    /// Fund code (e.g., "005827"). The identity key across the whole library.
    pub id: String,

    /// Fund display name.
    pub name: String,

    /// Sector/category label as reported by the API (e.g., "消费", "科技").
    #[serde(rename = "type")]
    pub category: String,
}

/// One stock position from a fund's published top-holdings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub name: String,

    /// Share of fund net value, in percent.
    pub percent: f64,

    /// Intraday percentage change of the underlying stock.
    pub change: f64,
}

/// An intraday valuation snapshot from `GET /fund/{id}`.
///
/// `nav` is the last published unit NAV; `estimate` / `est_rate` are the
/// provider's intraday estimate and its percentage change against `nav`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundDetail {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub category: String,

    /// Reference unit NAV from the last close.
    pub nav: f64,

    /// Current intraday NAV estimate.
    pub estimate: f64,

    /// Estimated percentage change vs `nav`.
    #[serde(rename = "estRate")]
    pub est_rate: f64,

    /// Timestamp of the estimate, as reported (e.g., "2026-08-28 14:45").
    pub time: String,

    /// Top holdings; empty when the provider has none on file.
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

/// One sample of the historical NAV series from `GET /fund/{id}/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    pub date: NaiveDate,
    pub nav: f64,
}

/// A fund on the user's watchlist: identity plus the last-known
/// valuation fields, updated in place by the refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedFund {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub category: String,

    pub nav: f64,
    pub estimate: f64,

    #[serde(rename = "estRate")]
    pub est_rate: f64,

    pub time: String,

    /// `true` when the entry was successfully enriched with detail data
    /// at add-time. Entries added from bare search metadata stay untrusted
    /// until their first successful refresh.
    #[serde(default)]
    pub trusted: bool,
}

impl WatchedFund {
    /// Build a trusted watchlist entry from a fresh detail snapshot.
    pub fn from_detail(detail: &FundDetail) -> Self {
        Self {
            id: detail.id.clone(),
            name: detail.name.clone(),
            category: detail.category.clone(),
            nav: detail.nav,
            estimate: detail.estimate,
            est_rate: detail.est_rate,
            time: detail.time.clone(),
            trusted: true,
        }
    }

    /// Build an untrusted placeholder from search metadata only.
    /// Valuation fields stay zeroed until the first successful refresh.
    pub fn from_meta(meta: &FundMeta) -> Self {
        Self {
            id: meta.id.clone(),
            name: meta.name.clone(),
            category: meta.category.clone(),
            nav: 0.0,
            estimate: 0.0,
            est_rate: 0.0,
            time: String::new(),
            trusted: false,
        }
    }

    /// Overlay a fetched snapshot onto this entry, in place.
    ///
    /// Every valuation field is replaced wholesale; a successful fetch also
    /// marks the entry trusted. The identifier is never touched — merges
    /// are keyed by it.
    pub fn apply(&mut self, detail: &FundDetail) {
        self.name = detail.name.clone();
        self.category = detail.category.clone();
        self.nav = detail.nav;
        self.estimate = detail.estimate;
        self.est_rate = detail.est_rate;
        self.time = detail.time.clone();
        self.trusted = true;
    }
}

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Alert preferences submitted with `POST /fund/{id}/subscribe`.
///
/// Transient: the client validates and posts the form, then holds no
/// further lifecycle responsibility — the alert service owns the
/// subscription from there. Wire field names are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPreference {
    pub email: String,

    /// Notify when the estimated change rises above this (percent).
    pub threshold_up: f64,

    /// Notify when the estimated change falls below this (percent).
    pub threshold_down: f64,

    /// Extra alert on unusually volatile intraday swings.
    pub enable_volatility: bool,

    /// Send a daily summary mail regardless of thresholds.
    pub enable_daily_digest: bool,

    /// Digest send time, "HH:MM" (24h).
    pub digest_time: String,
}

impl Default for SubscriptionPreference {
    fn default() -> Self {
        Self {
            email: String::new(),
            threshold_up: 2.0,
            threshold_down: -2.0,
            enable_volatility: true,
            enable_daily_digest: false,
            digest_time: "14:45".to_string(),
        }
    }
}

impl SubscriptionPreference {
    /// Validate the form before submission. The backend rejects missing
    /// emails with a 400; everything else we catch client-side.
    pub fn validate(&self) -> Result<(), CoreError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(CoreError::ValidationError("Email is required".into()));
        }
        if !email.contains('@') {
            return Err(CoreError::ValidationError(format!(
                "'{email}' is not a valid email address"
            )));
        }

        if !self.threshold_up.is_finite() || !self.threshold_down.is_finite() {
            return Err(CoreError::ValidationError(
                "Thresholds must be finite numbers".into(),
            ));
        }
        if self.threshold_up <= self.threshold_down {
            return Err(CoreError::ValidationError(format!(
                "Upper threshold ({}) must be greater than lower threshold ({})",
                self.threshold_up, self.threshold_down
            )));
        }

        if self.enable_daily_digest
            && NaiveTime::parse_from_str(&self.digest_time, "%H:%M").is_err()
        {
            return Err(CoreError::ValidationError(format!(
                "Invalid digest time '{}': expected HH:MM",
                self.digest_time
            )));
        }

        Ok(())
    }
}

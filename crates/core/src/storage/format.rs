use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::watchlist::Watchlist;

/// Current blob format version.
pub const CURRENT_VERSION: u32 = 1;

/// Envelope written to durable storage.
///
/// Layout (JSON):
/// ```text
/// { "version": 1, "watchlist": [ {WatchedFund}, ... ] }
/// ```
/// The version field lets a future format change migrate old blobs
/// instead of silently misreading them.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    watchlist: Watchlist,
}

/// Serialize a watchlist into the versioned blob.
pub fn encode(watchlist: &Watchlist) -> Result<String, CoreError> {
    let envelope = Envelope {
        version: CURRENT_VERSION,
        watchlist: watchlist.clone(),
    };
    serde_json::to_string(&envelope)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize watchlist: {e}")))
}

/// Parse a blob back into a watchlist, validating the version.
pub fn decode(blob: &str) -> Result<Watchlist, CoreError> {
    let envelope: Envelope = serde_json::from_str(blob)
        .map_err(|e| CoreError::InvalidBlob(format!("Not a valid watchlist blob: {e}")))?;

    if envelope.version == 0 || envelope.version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(envelope.version));
    }

    Ok(envelope.watchlist)
}

use serde::{Deserialize, Serialize};

/// A named account on the external account backend. Accounts group
/// watchlists server-side; this client only does CRUD on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// Request body for creating or updating an account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountRequest {
    pub name: String,
    pub description: String,
}

impl AccountRequest {
    /// Trims both fields; the backend treats the name as required.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            description: description.into().trim().to_string(),
        }
    }
}

use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::account::{Account, AccountRequest};

/// HTTP client for the external account/auth backend.
///
/// Authentication is a cookie-based session owned by the backend; the
/// client just carries the cookie jar across requests. This library takes
/// no position on how the session is established.
pub struct AccountClient {
    client: Client,
    base_url: String,
}

#[derive(serde::Deserialize)]
struct RegistrationFlag {
    registration_enabled: bool,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: String,
}

impl AccountClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder().cookie_store(true);
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

    async fn error_from_response(endpoint: &str, resp: reqwest::Response) -> CoreError {
        let status = resp.status().as_u16();
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

    /// List all accounts of the current session user.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, CoreError> {
        let resp = self.client.get(self.url("/accounts")).send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response("/accounts", resp).await);
        }
        resp.json::<Vec<Account>>().await.map_err(|e| CoreError::Api {
            endpoint: "/accounts".into(),
            message: format!("Failed to parse account list: {e}"),
        })
    }

    /// Create a new named account. The name must be non-empty.
    pub async fn create_account(&self, req: &AccountRequest) -> Result<Account, CoreError> {
        if req.name.is_empty() {
            return Err(CoreError::ValidationError(
                "Account name must not be empty".into(),
            ));
        }

        let resp = self
            .client
            .post(self.url("/accounts"))
            .json(req)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response("/accounts", resp).await);
        }
        resp.json::<Account>().await.map_err(|e| CoreError::Api {
            endpoint: "/accounts".into(),
            message: format!("Failed to parse created account: {e}"),
        })
    }

    /// Rename an account or change its description.
    pub async fn update_account(
        &self,
        id: i64,
        req: &AccountRequest,
    ) -> Result<Account, CoreError> {
        if req.name.is_empty() {
            return Err(CoreError::ValidationError(
                "Account name must not be empty".into(),
            ));
        }

        let endpoint = format!("/accounts/{id}");
        let resp = self
            .client
            .put(self.url(&endpoint))
            .json(req)
            .send()
            .await?;
        if resp.status().as_u16() == 404 {
            return Err(CoreError::AccountNotFound(id));
        }
        if !resp.status().is_success() {
            return Err(Self::error_from_response(&endpoint, resp).await);
        }
        resp.json::<Account>().await.map_err(|e| CoreError::Api {
            endpoint,
            message: format!("Failed to parse updated account: {e}"),
        })
    }

    /// Delete an account. Irreversible on the backend.
    pub async fn delete_account(&self, id: i64) -> Result<(), CoreError> {
        let endpoint = format!("/accounts/{id}");
        let resp = self.client.delete(self.url(&endpoint)).send().await?;
        if resp.status().as_u16() == 404 {
            return Err(CoreError::AccountNotFound(id));
        }
        if !resp.status().is_success() {
            return Err(Self::error_from_response(&endpoint, resp).await);
        }
        Ok(())
    }

    /// Feature flag: whether the backend currently accepts new user
    /// registrations.
    pub async fn registration_enabled(&self) -> Result<bool, CoreError> {
        let endpoint = "/auth/registration-enabled";
        let resp = self.client.get(self.url(endpoint)).send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(endpoint, resp).await);
        }
        let flag: RegistrationFlag = resp.json().await.map_err(|e| CoreError::Api {
            endpoint: endpoint.to_string(),
            message: format!("Failed to parse registration flag: {e}"),
        })?;
        Ok(flag.registration_enabled)
    }
}

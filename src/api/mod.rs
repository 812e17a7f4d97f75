//! HTTP client for the companion backend.
//!
//! Thin typed wrappers over the backend's JSON endpoints. The backend keeps
//! its session in a cookie, so the client carries a cookie jar. A 401 from
//! `finalize-login` or the app-data endpoints is a domain signal ("callback
//! not yet completed" / "not logged in"), not a transport failure, and is
//! surfaced as `Ok(false)` / `Ok(None)` rather than an error.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{FlightdeckError, Result};
use crate::types::AppData;

/// Browser hand-off returned by `/api/login`.
///
/// The caller opens `redirect_url` in the system browser; `state` correlates
/// the eventual redirect back to this pending authorization.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginStart {
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
    pub state: String,
}

/// Browser hand-off returned by `/api/add-character`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCharacterStart {
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct SuccessResponse {
    #[serde(default)]
    success: bool,
}

/// Client for the backend's JSON API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client with a cookie jar for the backend session.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(FlightdeckError::Network)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Begin a login for `account`.
    pub async fn login(&self, account: &str) -> Result<LoginStart> {
        let response = self
            .http
            .post(self.url("/api/login"))
            .json(&serde_json::json!({ "account": account }))
            .send()
            .await?;
        expect_json(response).await
    }

    /// Begin an add-character authorization for `account`.
    pub async fn add_character(&self, account: &str) -> Result<AddCharacterStart> {
        let response = self
            .http
            .post(self.url("/api/add-character"))
            .json(&serde_json::json!({ "account": account }))
            .send()
            .await?;
        expect_json(response).await
    }

    /// Attempt to exchange a pending browser authorization for a session.
    ///
    /// Returns `Ok(false)` while the backend reports the callback has not
    /// completed yet (401). Safe to call repeatedly for the same state.
    pub async fn finalize_login(&self, state: &str) -> Result<bool> {
        let response = self
            .http
            .post(self.url("/api/finalize-login"))
            .query(&[("state", state)])
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(false);
        }
        let body: SuccessResponse = expect_json(response).await?;
        Ok(body.success)
    }

    /// Fetch the application snapshot; `None` when not logged in.
    pub async fn app_data(&self) -> Result<Option<AppData>> {
        self.fetch_app_data("/api/app-data").await
    }

    /// Fetch the application snapshot, bypassing the backend's cache.
    pub async fn app_data_no_cache(&self) -> Result<Option<AppData>> {
        self.fetch_app_data("/api/app-data-no-cache").await
    }

    /// End the backend session.
    pub async fn logout(&self) -> Result<()> {
        let response = self.http.post(self.url("/api/logout")).send().await?;
        let _: SuccessResponse = expect_json(response).await?;
        Ok(())
    }

    async fn fetch_app_data(&self, path: &str) -> Result<Option<AppData>> {
        let response = self.http.get(self.url(path)).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let data = expect_json(response).await?;
        Ok(Some(data))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Decode a JSON body, mapping non-2xx responses to [`FlightdeckError::Api`].
async fn expect_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_to_error(status.as_u16(), &body));
    }
    Ok(response.json().await?)
}

/// Extract the backend's `{"error": ...}` message when present.
fn status_to_error(status: u16, body: &str) -> FlightdeckError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());
    FlightdeckError::api(status, message)
}

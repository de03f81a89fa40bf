use crate::domain::model::{NewServer, NewUser, RemoteServer, RemoteUser};
use crate::domain::ports::{ConfigProvider, PanelApi};
use crate::utils::error::{ProvisionError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Pterodactyl 回應都包在 `{"attributes": {...}}` 裡
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    attributes: T,
}

/// Pterodactyl application API 的 reqwest 實作
#[derive(Debug, Clone)]
pub struct PterodactylClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PterodactylClient {
    pub fn new(domain: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: format!("{}/api/application", domain.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_base(), config.api_key(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<P, R>(&self, path: &str, payload: &P) -> Result<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;
        tracing::debug!("Panel API response status: {}", status);

        if !status.is_success() {
            let message = extract_error_message(status.as_u16(), &body_text);
            tracing::warn!(path, status = status.as_u16(), "Panel API rejected request: {}", message);
            return Err(ProvisionError::RemoteApiError {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body_text).map_err(|e| ProvisionError::UnexpectedResponse {
            message: format!("{} returned an unreadable body: {}", path, e),
        })
    }
}

#[async_trait]
impl PanelApi for PterodactylClient {
    async fn create_user(&self, user: &NewUser) -> Result<RemoteUser> {
        let envelope: Envelope<RemoteUser> = self.post("/users", user).await?;
        Ok(envelope.attributes)
    }

    async fn create_server(&self, server: &NewServer) -> Result<RemoteServer> {
        let envelope: Envelope<RemoteServer> = self.post("/servers", server).await?;
        Ok(envelope.attributes)
    }
}

/// 從失敗的回應挑出最有用的錯誤訊息，依序嘗試：
///
/// 1. `errors[0].detail`
/// 2. `message`
/// 3. 原始 body（非空時）
/// 4. `"Pterodactyl error <status>"`
///
/// body 不是合法 JSON 時直接跳過前兩步。
pub fn extract_error_message(status: u16, body_text: &str) -> String {
    let parsed = if body_text.is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(body_text).ok()
    };

    parsed
        .as_ref()
        .and_then(first_error_detail)
        .or_else(|| parsed.as_ref().and_then(top_level_message))
        .or_else(|| (!body_text.is_empty()).then(|| body_text.to_string()))
        .unwrap_or_else(|| format!("Pterodactyl error {}", status))
}

fn first_error_detail(body: &Value) -> Option<String> {
    non_empty_str(body.get("errors")?.get(0)?.get("detail")?)
}

fn top_level_message(body: &Value) -> Option<String> {
    non_empty_str(body.get("message")?)
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

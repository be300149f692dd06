//! HTTP client for the employee API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use super::{ClientError, ClientResult};
use crate::config::AppConfig;
use crate::models::EmployeeRecord;

/// Error body shape; only `message` is read
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Anything the directory view can load employees from
#[async_trait]
pub trait EmployeeSource: Send + Sync {
    async fn fetch_employees(&self) -> ClientResult<Vec<EmployeeRecord>>;
}

/// HTTP client for the employee API
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Url::parse(base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from `DIRECTORY_API_BASE_URL` and `DIRECTORY_CLIENT_TIMEOUT_MS`
    pub fn from_config(config: &AppConfig) -> ClientResult<Self> {
        Self::new(&config.api_base_url, config.client_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Active employees (`GET /employees`)
    pub async fn fetch_employees(&self) -> ClientResult<Vec<EmployeeRecord>> {
        self.get("employees").await
    }

    /// One employee (`GET /employees/{id}`)
    pub async fn fetch_employee_by_id(&self, id: Uuid) -> ClientResult<EmployeeRecord> {
        self.get(&format!("employees/{}", id)).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, %url, "Directory request failed"))?;

        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(Into::into)
    }
}

#[async_trait]
impl EmployeeSource for DirectoryClient {
    async fn fetch_employees(&self) -> ClientResult<Vec<EmployeeRecord>> {
        DirectoryClient::fetch_employees(self).await
    }
}

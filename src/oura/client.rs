//! Oura v2 usercollection client.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use super::model::{DateWindow, HealthCategory, HealthSnapshot};
use crate::error::FetchError;

/// Source of trailing-window health snapshots.
#[async_trait]
pub trait HealthDataSource: Send + Sync {
    /// Fetch every category for the window of `days_back` days ending today.
    ///
    /// Any category failing fails the whole snapshot.
    async fn fetch_snapshot_window(&self, days_back: u32) -> Result<HealthSnapshot, FetchError>;
}

/// Connection settings for the Oura API.
#[derive(Debug, Clone)]
pub struct OuraConfig {
    /// Base URL that category endpoints are appended to.
    pub base_url: String,
    /// Personal access token sent as a bearer token.
    pub token: SecretString,
}

impl OuraConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.ouraring.com/v2/usercollection";
}

/// HTTP client for the Oura API.
pub struct OuraClient {
    config: OuraConfig,
    client: reqwest::Client,
}

impl OuraClient {
    pub fn new(config: OuraConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn category_url(&self, category: HealthCategory) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            category.endpoint()
        )
    }

    /// Read one category for `window`, returning the decoded body as-is.
    pub async fn fetch_category(
        &self,
        category: HealthCategory,
        window: &DateWindow,
    ) -> Result<serde_json::Value, FetchError> {
        debug!(%category, start = %window.start, end = %window.end, "Fetching Oura data");

        let resp = self
            .client
            .get(self.category_url(category))
            .bearer_auth(self.config.token.expose_secret())
            .query(&window.query_params())
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                category: category.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = FetchError::Status {
                category: category.to_string(),
                status: status.as_u16(),
                body,
            };
            if err.is_auth() {
                warn!(%category, status = status.as_u16(), "Oura rejected the access token");
            }
            return Err(err);
        }

        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| FetchError::Decode {
                category: category.to_string(),
                reason: e.to_string(),
            })
    }

    /// Read all four categories for an explicit window.
    pub async fn fetch_window(&self, window: DateWindow) -> Result<HealthSnapshot, FetchError> {
        let mut payloads: [serde_json::Value; 4] = Default::default();
        for (slot, category) in payloads.iter_mut().zip(HealthCategory::ALL) {
            *slot = self.fetch_category(category, &window).await?;
        }
        let [sleep, readiness, activity, workout] = payloads;

        info!(start = %window.start, end = %window.end, "Oura snapshot assembled");

        Ok(HealthSnapshot {
            window,
            sleep,
            readiness,
            activity,
            workout,
        })
    }
}

#[async_trait]
impl HealthDataSource for OuraClient {
    async fn fetch_snapshot_window(&self, days_back: u32) -> Result<HealthSnapshot, FetchError> {
        self.fetch_window(DateWindow::ending_today(days_back)).await
    }
}

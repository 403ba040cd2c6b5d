use super::models::{MatchesResponse, RawMatch};
use super::MatchSource;
use crate::config::Config;
use crate::error::{malformed_response_error, network_error, SyncResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("matchsync/", env!("CARGO_PKG_VERSION"));

/// League API client for `GET /api/teams/{team}/matches`
#[derive(Debug, Clone)]
pub struct LeagueApiClient {
    client: Client,
    base_url: String,
}

impl LeagueApiClient {
    /// Create a client against `base_url` with a total per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> SyncResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| network_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the application config
    pub fn from_config(config: &Config) -> SyncResult<Self> {
        Self::new(config.source_url.clone(), config.http_timeout())
    }

    /// The league site this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MatchSource for LeagueApiClient {
    async fn fetch(&self, team_number: i64) -> SyncResult<Vec<RawMatch>> {
        let url = format!("{}/api/teams/{}/matches", self.base_url, team_number);
        debug!("Fetching matches from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| network_error(&format!("Failed to fetch matches: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(network_error(&format!(
                "Failed to fetch matches: HTTP {} - {}",
                status, error_body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| network_error(&format!("Failed to read matches response: {}", e)))?;

        let parsed: MatchesResponse = serde_json::from_str(&body).map_err(|e| {
            malformed_response_error(&format!("Unexpected matches response from {}: {}", url, e))
        })?;

        Ok(parsed.data)
    }
}

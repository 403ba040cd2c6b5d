use crate::config::Config;
use crate::error::{google_calendar_error, network_error, SyncResult};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Google's OAuth token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens are refreshed this many seconds before they expire
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth token as cached on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Unix timestamp after which the access token is no longer valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl StoredToken {
    /// Whether the access token can still be used at `now`
    pub fn is_valid_at(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - EXPIRY_MARGIN_SECS > now,
            None => true,
        }
    }
}

/// Response body of the OAuth token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Convert to a cached token, keeping `previous_refresh` when Google does
    /// not issue a new refresh token
    pub fn into_stored(self, previous_refresh: Option<String>) -> StoredToken {
        let expires_in = self.expires_in.unwrap_or(3600);
        StoredToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expires_at: Some(Utc::now().timestamp() + expires_in),
        }
    }
}

/// Read the cached token, if there is one
pub fn load_token(path: &Path) -> SyncResult<Option<StoredToken>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let token = serde_json::from_str(&content).map_err(|e| {
        google_calendar_error(&format!("Failed to parse token file {}: {}", path.display(), e))
    })?;
    Ok(Some(token))
}

/// Write the token cache, creating its directory if needed
pub fn save_token(path: &Path, token: &StoredToken) -> SyncResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(token)?)?;
    Ok(())
}

/// Hands out access tokens, refreshing the cached one when it has expired
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<Config>,
    client: Client,
    token_url: String,
}

impl TokenManager {
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self {
            config,
            client,
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }

    /// Use another OAuth token endpoint
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Get a usable access token, refreshing and re-caching it if expired
    pub async fn get_token(&self) -> SyncResult<String> {
        let path = &self.config.token_path;
        let token = load_token(path)?.ok_or_else(|| {
            google_calendar_error(&format!(
                "No token found at {}. Run get_calendar_token first.",
                path.display()
            ))
        })?;

        if token.is_valid_at(Utc::now().timestamp()) {
            debug!("Using cached access token");
            return Ok(token.access_token);
        }

        let refreshed = self.refresh_token(&token).await?;
        save_token(path, &refreshed)?;
        info!("Refreshed Google access token");
        Ok(refreshed.access_token)
    }

    /// Refresh an expired token
    async fn refresh_token(&self, token: &StoredToken) -> SyncResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| google_calendar_error("Token expired and no refresh token is stored"))?;

        let params = [
            ("client_id", self.config.google_client_id.as_str()),
            ("client_secret", self.config.google_client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| network_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: TokenResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        Ok(new_token.into_stored(Some(refresh_token)))
    }
}

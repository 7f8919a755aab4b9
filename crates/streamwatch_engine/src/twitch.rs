use std::time::Duration;

use tokio::sync::Mutex;
use watch_logging::watch_info;

use crate::types::{StreamsEnvelope, TokenEnvelope};
use crate::{CatalogError, StreamRecord};

#[derive(Debug, Clone)]
pub struct HelixSettings {
    pub auth_base_url: String,
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub game_ids: Vec<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl HelixSettings {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        game_ids: Vec<String>,
    ) -> Self {
        Self {
            auth_base_url: "https://id.twitch.tv".to_string(),
            api_base_url: "https://api.twitch.tv".to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            game_ids,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Source of "currently live" broadcasts for the configured games.
///
/// Implementations own authentication; callers only ever see the listing.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn live_streams(&self) -> Result<Vec<StreamRecord>, CatalogError>;
}

/// Twitch Helix client with an app access token obtained via the
/// `client_credentials` grant. The token is cached and renewed once when the
/// streams endpoint rejects it.
pub struct HelixCatalog {
    settings: HelixSettings,
    client: reqwest::Client,
    token: Mutex<Option<String>>,
}

impl HelixCatalog {
    pub fn new(settings: HelixSettings) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| CatalogError::Network(err.to_string()))?;
        Ok(Self {
            settings,
            client,
            token: Mutex::new(None),
        })
    }

    async fn authenticate(&self) -> Result<String, CatalogError> {
        let url = format!("{}/oauth2/token", self.settings.auth_base_url);
        let response = self
            .client
            .post(&url)
            .query(&[
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(map_transport_error_for_auth)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Auth(format!("http status {status}")));
        }

        let token: TokenEnvelope = response
            .json()
            .await
            .map_err(|err| CatalogError::Auth(err.to_string()))?;
        Ok(token.access_token)
    }

    /// Returns the cached app token, acquiring one first if necessary.
    async fn cached_token(&self) -> Result<String, CatalogError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }
        let token = self.authenticate().await?;
        watch_info!("Acquired Twitch app access token");
        *guard = Some(token.clone());
        Ok(token)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    async fn list_once(&self, token: &str) -> Result<reqwest::Response, CatalogError> {
        let url = format!("{}/helix/streams", self.settings.api_base_url);
        let query: Vec<(&str, &str)> = self
            .settings
            .game_ids
            .iter()
            .map(|id| ("game_id", id.as_str()))
            .collect();
        self.client
            .get(&url)
            .header("Client-ID", &self.settings.client_id)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await
            .map_err(map_transport_error)
    }
}

#[async_trait::async_trait]
impl CatalogSource for HelixCatalog {
    async fn live_streams(&self) -> Result<Vec<StreamRecord>, CatalogError> {
        let token = self.cached_token().await?;
        let mut response = self.list_once(&token).await?;

        // App tokens expire server-side; a 401 here means renew and retry once.
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            watch_info!("Twitch app token rejected; renewing");
            self.invalidate_token().await;
            let token = self.cached_token().await?;
            response = self.list_once(&token).await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http(status.as_u16()));
        }

        let envelope: StreamsEnvelope = response
            .json()
            .await
            .map_err(|err| CatalogError::Malformed(err.to_string()))?;
        Ok(envelope.data)
    }
}

fn map_transport_error(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        return CatalogError::Timeout;
    }
    CatalogError::Network(err.to_string())
}

fn map_transport_error_for_auth(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        return CatalogError::Timeout;
    }
    CatalogError::Auth(err.to_string())
}

use serde::Deserialize;
use thiserror::Error;

/// One live broadcast as reported by the Helix streams endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamRecord {
    pub id: String,
    pub user_name: String,
    pub game_id: String,
    #[serde(default)]
    pub game_name: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamsEnvelope {
    pub data: Vec<StreamRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenEnvelope {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageEnvelope {
    pub id: String,
}

/// Content of a go-live notification, mapped from a qualifying catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamNotification {
    pub stream_id: String,
    pub broadcaster: String,
    pub game_name: String,
    pub title: String,
    /// Raw Helix thumbnail template with `{width}`/`{height}` placeholders.
    pub thumbnail_url: String,
}

/// Failure while acquiring credentials or listing live broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("credential exchange failed: {0}")]
    Auth(String),
    #[error("catalog listing failed with http status {0}")]
    Http(u16),
    #[error("catalog request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed catalog response: {0}")]
    Malformed(String),
}

/// Failure while posting a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("notification post failed with http status {0}")]
    Http(u16),
    #[error("notification post timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed sink response: {0}")]
    Malformed(String),
}

/// Failure while retracting a notification.
///
/// `AlreadyGone` means the notification no longer exists on the platform
/// (e.g. deleted by hand); callers treat it as a successful removal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetractError {
    #[error("notification already gone")]
    AlreadyGone,
    #[error("notification retract failed with http status {0}")]
    Http(u16),
    #[error("notification retract timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

use std::time::Duration;

use serde_json::json;

use crate::types::MessageEnvelope;
use crate::{RetractError, SinkError, StreamNotification};

const EMBED_GREEN: u32 = 0x2ECC71;

#[derive(Debug, Clone)]
pub struct DiscordSettings {
    pub api_base_url: String,
    pub bot_token: String,
    pub channel_id: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl DiscordSettings {
    pub fn new(bot_token: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            api_base_url: "https://discord.com/api/v10".to_string(),
            bot_token: bot_token.into(),
            channel_id: channel_id.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Destination for go-live notifications.
///
/// `post` returns an opaque handle whose only use is a later `retract`.
/// `post_text` carries operator-visible plain messages (acknowledgments,
/// per-iteration error reports) into the same channel.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn post(&self, notification: &StreamNotification) -> Result<String, SinkError>;
    async fn retract(&self, handle: &str) -> Result<(), RetractError>;
    async fn post_text(&self, content: &str) -> Result<(), SinkError>;
}

/// Discord REST sink: posts rich embeds into one channel and deletes them on
/// retract. The handle is the Discord message id.
pub struct DiscordSink {
    settings: DiscordSettings,
    client: reqwest::Client,
}

impl DiscordSink {
    pub fn new(settings: DiscordSettings) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SinkError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/channels/{}/messages",
            self.settings.api_base_url, self.settings.channel_id
        )
    }

    async fn send_message(&self, body: serde_json::Value) -> Result<String, SinkError> {
        let response = self
            .client
            .post(self.messages_url())
            .header("Authorization", format!("Bot {}", self.settings.bot_token))
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    SinkError::Timeout
                } else {
                    SinkError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Http(status.as_u16()));
        }

        let message: MessageEnvelope = response
            .json()
            .await
            .map_err(|err| SinkError::Malformed(err.to_string()))?;
        Ok(message.id)
    }
}

#[async_trait::async_trait]
impl NotificationSink for DiscordSink {
    async fn post(&self, notification: &StreamNotification) -> Result<String, SinkError> {
        let mut embed = json!({
            "title": format!(
                "🎮 Alakazoom! **{}** is live playing {}!",
                notification.broadcaster, notification.game_name
            ),
            "description": format!(
                "📜 Title: {}\n🔗 [Twitch Stream Link](https://twitch.tv/{})",
                notification.title, notification.broadcaster
            ),
            "color": EMBED_GREEN,
        });
        if !notification.thumbnail_url.is_empty() {
            embed["image"] = json!({ "url": expand_thumbnail(&notification.thumbnail_url) });
        }

        self.send_message(json!({ "embeds": [embed] })).await
    }

    async fn retract(&self, handle: &str) -> Result<(), RetractError> {
        let url = format!("{}/{}", self.messages_url(), handle);
        let response = self
            .client
            .delete(&url)
            .header("Authorization", format!("Bot {}", self.settings.bot_token))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    RetractError::Timeout
                } else {
                    RetractError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RetractError::AlreadyGone);
        }
        if !status.is_success() {
            return Err(RetractError::Http(status.as_u16()));
        }
        Ok(())
    }

    async fn post_text(&self, content: &str) -> Result<(), SinkError> {
        self.send_message(json!({ "content": content }))
            .await
            .map(|_| ())
    }
}

/// Expands a Helix `{width}x{height}` thumbnail template to 16:9 (480x270).
pub fn expand_thumbnail(template: &str) -> String {
    template.replace("{width}", "480").replace("{height}", "270")
}

//! Streamwatch engine: external IO against the Twitch catalog and the
//! Discord notification channel.
mod discord;
mod twitch;
mod types;

pub use discord::{expand_thumbnail, DiscordSettings, DiscordSink, NotificationSink};
pub use twitch::{CatalogSource, HelixCatalog, HelixSettings};
pub use types::{CatalogError, RetractError, SinkError, StreamNotification, StreamRecord};

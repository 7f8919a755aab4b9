//! Process configuration, read from the environment once at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

// Defaults cover the community the monitor was built for: Diddy Kong Racing
// speedrunning. Game ids are Diddy Kong Racing DS and Diddy Kong Racing.
const DEFAULT_GAME_IDS: &[&str] = &["5093", "14660"];

const DEFAULT_KEYWORDS: &[&str] = &[
    "any%",
    "100%",
    "car%",
    "hover%",
    "plane%",
    "atr",
    "all trophy races",
    "speedrun",
    "practice",
    "learning",
    "marathon",
    "dkr64",
    "time trial",
    "wr",
    "world record",
    "pb",
    "rando",
    "randomizer",
    "T.T.",
    "tt",
    "unlocking",
    "rta",
    "ディディーコングレーシング",
    "ディディーコング",
    "ディディ",
    "tammy",
    "amulet",
    "grind",
    "hundo",
    "100",
    "DKR",
    "tourney",
    "tournament",
    "trophy",
    "no wrong warp",
    "wrong warp",
    "ww",
    "all minigames",
    "all bosses",
    "adventure 2 100%",
    "true 100%",
    "atrmc",
];

const DEFAULT_TAGS: &[&str] = &["speedrun"];
const DEFAULT_ROLE: &str = "Moderator";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_HEALTH_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_bot_token: String,
    pub discord_channel_id: String,
    pub twitch_client_id: String,
    pub twitch_client_secret: String,
    pub required_role: String,
    pub game_ids: Vec<String>,
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
    pub poll_interval: Duration,
    pub health_port: u16,
}

impl Config {
    /// Reads the configuration from the environment. Missing credentials are
    /// the only process-fatal condition in the system, surfaced here.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            discord_bot_token: require("DISCORD_BOT_TOKEN")?,
            discord_channel_id: require("DISCORD_CHANNEL_ID")?,
            twitch_client_id: require("TWITCH_CLIENT_ID")?,
            twitch_client_secret: require("TWITCH_CLIENT_SECRET")?,
            required_role: env::var("MODERATOR_ROLE").unwrap_or_else(|_| DEFAULT_ROLE.to_string()),
            game_ids: list_var("GAME_IDS", DEFAULT_GAME_IDS),
            keywords: list_var("TITLE_KEYWORDS", DEFAULT_KEYWORDS),
            tags: list_var("STREAM_TAGS", DEFAULT_TAGS),
            poll_interval: Duration::from_secs(parse_var(
                "POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL_SECS,
            )?),
            health_port: parse_var("HEALTH_PORT", DEFAULT_HEALTH_PORT)?,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn list_var(name: &'static str, default: &[&str]) -> Vec<String> {
    match env::var(name) {
        Ok(raw) => {
            let items = parse_list(&raw);
            if items.is_empty() {
                default.iter().map(ToString::to_string).collect()
            } else {
                items
            }
        }
        Err(_) => default.iter().map(ToString::to_string).collect(),
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated variable into trimmed, non-empty items.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

//! # Configuration Module
//!
//! Startup configuration for the ticket bot. Values come from the process
//! environment (after `.env` has been loaded) and are read exactly once.

use std::env;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::qr::QrSource;

// Constants for bot configuration
pub const DEFAULT_LANGUAGE: &str = "fa";
pub const DEFAULT_PENDING_ID_TIMEOUT_SECS: u64 = 600; // 10 minutes

/// Configuration structure for the ticket bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot credential
    pub telegram_bot_token: String,
    /// Root URL of the ticketing API, without trailing slash
    pub api_base_url: String,
    /// How ticket QR images are obtained
    pub qr_source: QrSource,
    /// Reply language when the sender's language is unsupported
    pub default_language: String,
    /// Lifetime of an "awaiting ID" wait
    pub pending_id_timeout: Duration,
    /// Per-request timeout for outbound HTTP calls (none when unset)
    pub api_timeout: Option<Duration>,
}

impl BotConfig {
    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration from an arbitrary key source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let telegram_bot_token = get("TELEGRAM_BOT_TOKEN")
            .or_else(|| get("TOKEN"))
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let api_base_url = get("API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or(ConfigError::Missing("API_BASE_URL"))?;

        let qr_source = match get("QR_SOURCE") {
            Some(value) => value.parse::<QrSource>().map_err(|_| ConfigError::Invalid {
                var: "QR_SOURCE",
                value,
            })?,
            None => QrSource::default(),
        };

        let default_language = match get("BOT_LANGUAGE") {
            Some(value) if crate::localization::is_supported_language(&value) => {
                crate::localization::detect_language(Some(&value)).to_string()
            }
            Some(value) => {
                return Err(ConfigError::Invalid {
                    var: "BOT_LANGUAGE",
                    value,
                })
            }
            None => DEFAULT_LANGUAGE.to_string(),
        };

        let pending_id_timeout = Duration::from_secs(
            parse_secs(get("PENDING_ID_TIMEOUT_SECS"), "PENDING_ID_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_PENDING_ID_TIMEOUT_SECS),
        );

        let api_timeout =
            parse_secs(get("API_TIMEOUT_SECS"), "API_TIMEOUT_SECS")?.map(Duration::from_secs);

        Ok(Self {
            telegram_bot_token,
            api_base_url,
            qr_source,
            default_language,
            pending_id_timeout,
            api_timeout,
        })
    }
}

fn parse_secs(value: Option<String>, var: &'static str) -> Result<Option<u64>, ConfigError> {
    match value {
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(None),
    }
}

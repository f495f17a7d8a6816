use std::env;

use chrono_tz::Tz;

use crate::errors::TldrError;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5";
pub const DEFAULT_COMMAND_PREFIX: &str = "!";
pub const DEFAULT_MAX_TRANSCRIPT_TOKENS: usize = 100_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_bot_token: String,
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: Option<String>,
    pub command_prefix: String,
    pub timezone: Tz,
    pub include_bot_messages: bool,
    pub max_transcript_tokens: usize,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first missing or invalid variable.
    pub fn from_env() -> Result<Self, TldrError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TldrError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    TldrError::ConfigError(format!("{key}: environment variable not set"))
                })
        };

        let timezone = match lookup("TLDR_TIMEZONE") {
            Some(raw) => raw
                .trim()
                .parse::<Tz>()
                .map_err(|e| TldrError::ConfigError(format!("TLDR_TIMEZONE: {e}")))?,
            None => Tz::UTC,
        };

        let include_bot_messages = match lookup("TLDR_INCLUDE_BOTS") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                TldrError::ConfigError(format!(
                    "TLDR_INCLUDE_BOTS: expected true/false, got {raw:?}"
                ))
            })?,
            None => false,
        };

        let max_transcript_tokens = match lookup("TLDR_MAX_TRANSCRIPT_TOKENS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| TldrError::ConfigError(format!("TLDR_MAX_TRANSCRIPT_TOKENS: {e}")))?,
            None => DEFAULT_MAX_TRANSCRIPT_TOKENS,
        };

        Ok(Self {
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_org_id: lookup("OPENAI_ORG_ID"),
            openai_model: lookup("OPENAI_MODEL"),
            command_prefix: lookup("TLDR_COMMAND_PREFIX")
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            timezone,
            include_bot_messages,
            max_transcript_tokens,
        })
    }

    #[must_use]
    pub fn model_name(&self) -> String {
        self.openai_model
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

use poise::serenity_prelude as serenity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TldrError {
    #[error("Could not derive a time range: {0}")]
    AmbiguousTimeRequest(String),

    #[error("Channel history unavailable: {0}")]
    HistoryUnavailable(String),

    #[error("Failed to summarize messages: {0}")]
    SummarizationFailed(String),

    #[error("Failed to access OpenAI API: {0}")]
    OpenAIError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to access Discord API: {0}")]
    DiscordError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// User-facing failure category a [`TldrError`] is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    AmbiguousTimeRequest,
    HistoryUnavailable,
    SummarizationFailed,
    Internal,
}

impl TldrError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            TldrError::AmbiguousTimeRequest(_) => ErrorCategory::AmbiguousTimeRequest,
            TldrError::HistoryUnavailable(_) => ErrorCategory::HistoryUnavailable,
            TldrError::SummarizationFailed(_) => ErrorCategory::SummarizationFailed,
            TldrError::OpenAIError(_)
            | TldrError::HttpError(_)
            | TldrError::DiscordError(_)
            | TldrError::ConfigError(_) => ErrorCategory::Internal,
        }
    }
}

impl From<reqwest::Error> for TldrError {
    fn from(error: reqwest::Error) -> Self {
        TldrError::HttpError(error.to_string())
    }
}

impl From<serenity::Error> for TldrError {
    fn from(error: serenity::Error) -> Self {
        TldrError::DiscordError(error.to_string())
    }
}

//! Command handler: drives resolve → fetch → build → summarize and turns the
//! outcome, success or failure, into a [`Reply`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use super::render::{render_empty, render_error, render_help, render_summary};
use super::resolve::TimeRangeResolver;
use super::summarize::Summarizer;
use super::{collect, transcript};
use crate::ai::client::LanguageModel;
use crate::core::config::{AppConfig, DEFAULT_COMMAND_PREFIX, DEFAULT_MAX_TRANSCRIPT_TOKENS};
use crate::core::models::{ChannelHandle, Reply, SummaryResult};
use crate::errors::TldrError;
use crate::features::collect::HistorySource;
use crate::utils::filters::{FilterOptions, filter_conversation};

#[derive(Debug, Clone)]
pub struct HandlerSettings {
    pub command_prefix: String,
    pub timezone: Tz,
    pub include_bot_messages: bool,
    pub max_transcript_tokens: usize,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            timezone: Tz::UTC,
            include_bot_messages: false,
            max_transcript_tokens: DEFAULT_MAX_TRANSCRIPT_TOKENS,
        }
    }
}

impl From<&AppConfig> for HandlerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            command_prefix: config.command_prefix.clone(),
            timezone: config.timezone,
            include_bot_messages: config.include_bot_messages,
            max_transcript_tokens: config.max_transcript_tokens,
        }
    }
}

/// Holds only immutable collaborators, so concurrent invocations need no
/// synchronization.
pub struct CommandHandler {
    resolver: TimeRangeResolver,
    history: Arc<dyn HistorySource>,
    summarizer: Summarizer,
    settings: HandlerSettings,
}

impl CommandHandler {
    #[must_use]
    pub fn new(
        model: Arc<dyn LanguageModel>,
        history: Arc<dyn HistorySource>,
        settings: HandlerSettings,
    ) -> Self {
        Self {
            resolver: TimeRangeResolver::new(Arc::clone(&model), settings.timezone),
            history,
            summarizer: Summarizer::new(model),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    /// Run the whole pipeline for one command. Never fails: every error kind
    /// is rendered as a user-facing reply.
    pub async fn handle(
        &self,
        raw_command_text: &str,
        channel: ChannelHandle,
        reference_time: DateTime<Utc>,
    ) -> Reply {
        let correlation_id = Uuid::new_v4();
        let span = info_span!(
            "tldr_command",
            correlation_id = %correlation_id,
            channel_id = %channel
        );

        async {
            info!("Handling tldr request {:?}", raw_command_text);
            match self.summarize_range(raw_command_text, channel, reference_time).await {
                Ok(result) if result.record_count == 0 => {
                    info!("Nothing to summarize ({} messages)", result.message_count);
                    render_empty(&result, raw_command_text, self.settings.timezone)
                }
                Ok(result) => {
                    info!(
                        "Summary ready: {} messages, {} omitted",
                        result.message_count, result.omitted
                    );
                    render_summary(
                        &result,
                        raw_command_text,
                        &self.settings.command_prefix,
                        self.settings.timezone,
                    )
                }
                Err(e) => {
                    match &e {
                        TldrError::AmbiguousTimeRequest(_) => warn!("{}", e),
                        _ => error!("tldr pipeline failed: {}", e),
                    }
                    render_error(&e, raw_command_text, &self.settings.command_prefix)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Resolve, fetch, build and summarize without rendering.
    ///
    /// # Errors
    ///
    /// Returns the failing stage's error kind.
    pub async fn summarize_range(
        &self,
        raw_command_text: &str,
        channel: ChannelHandle,
        reference_time: DateTime<Utc>,
    ) -> Result<SummaryResult, TldrError> {
        let time_range = self
            .resolver
            .resolve(raw_command_text, reference_time)
            .await?;

        let messages = collect::fetch(self.history.as_ref(), channel, time_range).await?;
        let messages = filter_conversation(
            messages,
            &FilterOptions {
                include_bots: self.settings.include_bot_messages,
                command_prefix: self.settings.command_prefix.clone(),
            },
        );

        let built = transcript::build(&messages);
        let (fitted, omitted) =
            transcript::fit_to_budget(built, self.settings.max_transcript_tokens);
        if omitted > 0 {
            warn!("Dropped {} oldest records to fit the context budget", omitted);
        }

        let text = self.summarizer.summarize(&fitted).await?;

        Ok(SummaryResult {
            text,
            message_count: fitted.message_count(),
            record_count: fitted.len(),
            time_range,
            omitted,
        })
    }

    #[must_use]
    pub fn help(&self) -> Reply {
        render_help(&self.settings.command_prefix)
    }
}

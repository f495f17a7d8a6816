//! Discord API client module
//!
//! Implements history retrieval on top of serenity's HTTP client. A single
//! attempt per page; retry policy is left to serenity's own rate limiter.

use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::{debug, warn};

use crate::core::models::{ChannelHandle, HistoryMessage};
use crate::errors::TldrError;
use crate::features::collect::{HistoryCursor, HistorySource};
use crate::utils::time::{snowflake_before, timestamp_from_snowflake};

/// Map a serenity message onto the platform-neutral shape.
#[must_use]
pub fn to_history_message(msg: &serenity::Message) -> HistoryMessage {
    let author_display_name = msg
        .member
        .as_ref()
        .and_then(|m| m.nick.clone())
        .or_else(|| msg.author.global_name.clone())
        .unwrap_or_else(|| msg.author.name.clone());

    HistoryMessage {
        id: msg.id.get(),
        timestamp: timestamp_from_snowflake(msg.id.get()),
        author_display_name,
        author_is_bot: msg.author.bot,
        content: msg.content.clone(),
    }
}

/// Exclusive `after` snowflake for a history cursor. Discord ids are
/// non-zero, so the result is at least 1.
#[must_use]
pub fn after_id(cursor: HistoryCursor) -> u64 {
    match cursor {
        HistoryCursor::Since(ts) => snowflake_before(ts),
        HistoryCursor::After(id) => id.max(1),
    }
}

/// Serenity-backed channel history
pub struct DiscordHistory {
    http: Arc<serenity::Http>,
}

impl DiscordHistory {
    #[must_use]
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HistorySource for DiscordHistory {
    async fn page(
        &self,
        channel: ChannelHandle,
        cursor: HistoryCursor,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, TldrError> {
        let after = after_id(cursor);
        debug!("Fetching up to {} messages after {} in {}", limit, after, channel);

        let builder = serenity::GetMessages::new()
            .after(serenity::MessageId::new(after))
            .limit(limit);

        let messages = serenity::ChannelId::new(channel.0.max(1))
            .messages(self.http.as_ref(), builder)
            .await
            .map_err(|e| {
                warn!("History request for channel {} failed: {}", channel, e);
                TldrError::HistoryUnavailable(e.to_string())
            })?;

        let mut page: Vec<HistoryMessage> = messages.iter().map(to_history_message).collect();
        page.sort_by_key(|m| m.id);
        Ok(page)
    }
}

//! History retrieval for a resolved [`TimeRange`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use tracing::info;

use crate::core::models::{ChannelHandle, HistoryMessage, TimeRange};
use crate::errors::TldrError;

/// Max messages requested per history page (the Discord API ceiling).
pub const PAGE_SIZE: u8 = 100;

/// Where a history page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCursor {
    /// Messages sent at or after this instant.
    Since(DateTime<Utc>),
    /// Messages with an id strictly greater than this one.
    After(u64),
}

/// The platform's history traversal capability.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch up to `limit` messages following `cursor`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryUnavailable` when access is denied or the platform is
    /// unreachable.
    async fn page(
        &self,
        channel: ChannelHandle,
        cursor: HistoryCursor,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, TldrError>;
}

/// Lazily page through `channel`, yielding messages inside `range` in
/// ascending order. Paging stops once a page runs past `range.end()`.
pub fn history_in_range<'a, S>(
    source: &'a S,
    channel: ChannelHandle,
    range: TimeRange,
) -> impl Stream<Item = Result<HistoryMessage, TldrError>> + Send + 'a
where
    S: HistorySource + ?Sized,
{
    stream::try_unfold(
        Some(HistoryCursor::Since(range.start())),
        move |cursor| async move {
            let Some(cursor) = cursor else {
                return Ok::<_, TldrError>(None);
            };

            let mut page = source.page(channel, cursor, PAGE_SIZE).await?;
            page.sort_by_key(|m| (m.timestamp, m.id));

            let next = match page.last() {
                Some(last) if page.len() >= usize::from(PAGE_SIZE) && last.timestamp <= range.end() => {
                    Some(HistoryCursor::After(last.id))
                }
                _ => None,
            };

            Ok(Some((page, next)))
        },
    )
    .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
    .try_flatten()
    .try_filter(move |msg| future::ready(range.contains(msg.timestamp)))
    .boxed()
}

/// Materialize every message in `range`. A single attempt; no retries.
///
/// # Errors
///
/// Propagates `HistoryUnavailable` from the source.
pub async fn fetch<S>(
    source: &S,
    channel: ChannelHandle,
    range: TimeRange,
) -> Result<Vec<HistoryMessage>, TldrError>
where
    S: HistorySource + ?Sized,
{
    let mut messages: Vec<HistoryMessage> =
        history_in_range(source, channel, range).try_collect().await?;
    messages.sort_by_key(|m| (m.timestamp, m.id));

    info!(
        "Fetched {} messages from channel {} in range",
        messages.len(),
        channel
    );
    Ok(messages)
}

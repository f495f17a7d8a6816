use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorCategory, TldrError};

/// Closed interval `[start, end]` a summary covers.
///
/// Deserialization goes through [`TimeRange::new`], so an inverted range can
/// never be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeRangeBounds")]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Unchecked wire form of a [`TimeRange`].
#[derive(Deserialize)]
struct TimeRangeBounds {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<TimeRangeBounds> for TimeRange {
    type Error = TldrError;

    fn try_from(bounds: TimeRangeBounds) -> Result<Self, Self::Error> {
        TimeRange::new(bounds.start, bounds.end)
    }
}

impl TimeRange {
    /// # Errors
    ///
    /// Returns `AmbiguousTimeRequest` when `start` is after `end`. The bounds
    /// are never swapped.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TldrError> {
        if start > end {
            return Err(TldrError::AmbiguousTimeRequest(format!(
                "start {} is after end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Identity of the channel a command was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelHandle(pub u64);

impl fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat message as retrieved from the platform, before transcript mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub author_display_name: String,
    pub author_is_bot: bool,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub timestamp: DateTime<Utc>,
    pub author_display_name: String,
    pub content: String,
}

/// Ordered records handed to the summarizer. Immutable once built.
///
/// `message_count` counts every retrieved message, including those excluded
/// from `records` for lacking text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    records: Vec<MessageRecord>,
    message_count: usize,
}

impl Transcript {
    /// Records are stably sorted by timestamp, so equal timestamps keep
    /// their given order.
    #[must_use]
    pub fn new(mut records: Vec<MessageRecord>, message_count: usize) -> Self {
        records.sort_by_key(|r| r.timestamp);
        Self {
            records,
            message_count,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.message_count
    }

    /// Keep only the newest `count` records; `message_count` is unchanged.
    #[must_use]
    pub fn keep_newest(self, count: usize) -> Self {
        let skip = self.records.len().saturating_sub(count);
        Self {
            records: self.records.into_iter().skip(skip).collect(),
            message_count: self.message_count,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub text: String,
    pub message_count: usize,
    /// Records actually sent to the model.
    pub record_count: usize,
    pub time_range: TimeRange,
    /// Oldest records dropped to fit the model's context budget.
    pub omitted: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Summary,
    Empty,
    Help,
    Error(ErrorCategory),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Platform-neutral rendered reply; the Discord layer turns it into an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub title: String,
    pub description: String,
    pub fields: Vec<ReplyField>,
    pub color: u32,
}

impl Reply {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ReplyField> {
        self.fields.iter().find(|f| f.name.contains(name))
    }
}

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tldr::TldrError;
use tldr::ai::CompletionRequest;
use tldr::ai::LanguageModel;
use tldr::core::models::{ChannelHandle, HistoryMessage};
use tldr::features::{HistoryCursor, HistorySource};

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
}

pub fn message(id: u64, ts: DateTime<Utc>, author: &str, content: &str) -> HistoryMessage {
    HistoryMessage {
        id,
        timestamp: ts,
        author_display_name: author.to_string(),
        author_is_bot: false,
        content: content.to_string(),
    }
}

/// One message per minute from `from` (inclusive) for `count` minutes.
pub fn minute_corpus(from: DateTime<Utc>, count: u64) -> Vec<HistoryMessage> {
    (0..count)
        .map(|i| {
            let minutes = i64::try_from(i).unwrap();
            message(
                i + 1,
                from + chrono::Duration::minutes(minutes),
                "alice",
                &format!("message {i}"),
            )
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub structured: bool,
    pub user_text: String,
}

pub enum Answer {
    Fixed(String),
    /// Replies with the given prefix followed by the last user turn.
    Echo(&'static str),
    Fail(String),
}

/// Language model double that answers from a script and records every call.
pub struct ScriptedModel {
    time_range: Answer,
    summary: Answer,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new(time_range: Answer, summary: Answer) -> Self {
        Self {
            time_range,
            summary,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn summarizing(summary: Answer) -> Self {
        Self::new(Answer::Fail("unexpected time-range call".into()), summary)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn structured_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.structured).count()
    }

    pub fn summary_calls(&self) -> usize {
        self.calls().iter().filter(|c| !c.structured).count()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, TldrError> {
        let user_text = request.last_user_text().unwrap_or_default().to_string();
        let structured = request.output_schema.is_some();
        self.calls.lock().unwrap().push(RecordedCall {
            structured,
            user_text: user_text.clone(),
        });

        let answer = if structured { &self.time_range } else { &self.summary };
        match answer {
            Answer::Fixed(text) => Ok(text.clone()),
            Answer::Echo(prefix) => Ok(format!("{prefix}{user_text}")),
            Answer::Fail(reason) => Err(TldrError::OpenAIError(reason.clone())),
        }
    }
}

/// In-memory channel history honouring the paging contract.
pub struct MemoryHistory {
    messages: Vec<HistoryMessage>,
    failure: Option<String>,
    pages: AtomicUsize,
}

impl MemoryHistory {
    pub fn new(messages: Vec<HistoryMessage>) -> Self {
        Self {
            messages,
            failure: None,
            pages: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            messages: Vec::new(),
            failure: Some(reason.to_string()),
            pages: AtomicUsize::new(0),
        }
    }

    pub fn pages_requested(&self) -> usize {
        self.pages.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistorySource for MemoryHistory {
    async fn page(
        &self,
        _channel: ChannelHandle,
        cursor: HistoryCursor,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, TldrError> {
        self.pages.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.failure {
            return Err(TldrError::HistoryUnavailable(reason.clone()));
        }

        let mut page: Vec<HistoryMessage> = self
            .messages
            .iter()
            .filter(|m| match cursor {
                HistoryCursor::Since(ts) => m.timestamp >= ts,
                HistoryCursor::After(id) => m.id > id,
            })
            .cloned()
            .collect();
        page.sort_by_key(|m| m.id);
        page.truncate(usize::from(limit));
        Ok(page)
    }
}

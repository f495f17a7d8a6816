use crate::ai::client::estimate_tokens;
use crate::core::models::{HistoryMessage, MessageRecord, Transcript};

/// Map retrieved messages to transcript records.
///
/// Messages whose content is empty after trimming (attachment-only posts,
/// embeds) are left out of `records` but still counted in `message_count`.
/// Records keep retrieval order, re-sorted stably by timestamp.
#[must_use]
pub fn build(messages: &[HistoryMessage]) -> Transcript {
    let records: Vec<MessageRecord> = messages
        .iter()
        .filter_map(|msg| {
            let content = msg.content.trim();
            if content.is_empty() {
                return None;
            }
            Some(MessageRecord {
                timestamp: msg.timestamp,
                author_display_name: msg.author_display_name.clone(),
                content: content.to_string(),
            })
        })
        .collect();

    Transcript::new(records, messages.len())
}

fn record_tokens(record: &MessageRecord) -> usize {
    // "[<rfc3339>] " prefix is ~23 chars, roughly 6 tokens
    estimate_tokens(&record.author_display_name) + estimate_tokens(&record.content) + 6
}

/// Drop the oldest records until the transcript's estimated size fits
/// `max_tokens`. The newest record is always kept. Returns the trimmed
/// transcript and how many records were dropped.
#[must_use]
pub fn fit_to_budget(transcript: Transcript, max_tokens: usize) -> (Transcript, usize) {
    let records = transcript.records();

    let mut total = 0usize;
    let mut keep_from = records.len();
    for (idx, record) in records.iter().enumerate().rev() {
        let cost = record_tokens(record);
        if total + cost > max_tokens && keep_from < records.len() {
            break;
        }
        total += cost;
        keep_from = idx;
    }

    let omitted = keep_from;
    let kept = records.len() - keep_from;
    (transcript.keep_newest(kept), omitted)
}

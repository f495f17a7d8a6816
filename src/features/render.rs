//! Response-related utilities.
//!
//! Builds platform-neutral [`Reply`] values; `discord::response_builder`
//! turns them into embeds.

use chrono_tz::Tz;

use crate::core::models::{Reply, ReplyField, ReplyKind, SummaryResult, TimeRange};
use crate::errors::{ErrorCategory, TldrError};
use crate::utils::time::format_in_zone;

/// Discord embed description limit, in characters
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;
/// Discord embed field value limit, in characters
pub const EMBED_FIELD_VALUE_LIMIT: usize = 1024;

pub const COLOR_SUMMARY: u32 = 0x3498_DB;
pub const COLOR_HELP: u32 = 0x2ECC_71;
pub const COLOR_EMPTY: u32 = 0x95A5_A6;
pub const COLOR_ERROR: u32 = 0xED42_45;

/// Canonical failure message shown to users when summarization fails.
pub const CANONICAL_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't generate a summary at this time. Please try again later.";

pub const EXAMPLE_REQUESTS: [&str; 6] = [
    "last hour",
    "yesterday",
    "last 3 hours",
    "this morning",
    "last week",
    "today",
];

/// Truncate to `limit` characters, marking the cut with an ellipsis.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn field(name: &str, value: impl Into<String>, inline: bool) -> ReplyField {
    ReplyField {
        name: name.to_string(),
        value: truncate_chars(&value.into(), EMBED_FIELD_VALUE_LIMIT),
        inline,
    }
}

fn time_frame_value(range: &TimeRange, tz: Tz) -> String {
    format!(
        "From: {}\nTo: {}",
        format_in_zone(range.start(), tz),
        format_in_zone(range.end(), tz)
    )
}

/// Strip backticks so a user phrase cannot break inline-code formatting.
fn quote_request(request: &str) -> String {
    format!("`{}`", request.replace('`', "'"))
}

#[must_use]
pub fn render_summary(result: &SummaryResult, request: &str, prefix: &str, tz: Tz) -> Reply {
    let mut fields = vec![
        field("📅 Time Frame", time_frame_value(&result.time_range, tz), false),
        field("💬 Messages Analyzed", result.message_count.to_string(), true),
        field("📊 Original Request", quote_request(request), true),
    ];

    if result.omitted > 0 {
        fields.push(field(
            "✂️ Note",
            format!(
                "The {} oldest messages were left out to fit the model's context window. \
                 Try `{prefix}tldr` with a shorter time range for full coverage.",
                result.omitted
            ),
            false,
        ));
    }

    Reply {
        kind: ReplyKind::Summary,
        title: "📋 Channel TLDR Summary".to_string(),
        description: truncate_chars(&result.text, EMBED_DESCRIPTION_LIMIT),
        fields,
        color: COLOR_SUMMARY,
    }
}

#[must_use]
pub fn render_empty(result: &SummaryResult, request: &str, tz: Tz) -> Reply {
    Reply {
        kind: ReplyKind::Empty,
        title: "📭 Nothing to summarize".to_string(),
        description: format!(
            "{} ({} – {})",
            result.text,
            format_in_zone(result.time_range.start(), tz),
            format_in_zone(result.time_range.end(), tz)
        ),
        fields: vec![
            field("💬 Messages Analyzed", result.message_count.to_string(), true),
            field("📊 Original Request", quote_request(request), true),
        ],
        color: COLOR_EMPTY,
    }
}

#[must_use]
pub fn render_error(error: &TldrError, request: &str, prefix: &str) -> Reply {
    let category = error.category();
    let (title, description) = match category {
        ErrorCategory::AmbiguousTimeRequest => (
            "❌ Ambiguous time request",
            format!(
                "I couldn't work out a time range from {}. \
                 Try something like `{prefix}tldr last hour`, `{prefix}tldr yesterday` \
                 or `{prefix}tldr last 3 hours`.",
                quote_request(request)
            ),
        ),
        ErrorCategory::HistoryUnavailable => (
            "❌ History unavailable",
            "I couldn't read this channel's message history. \
             Check that I have the *Read Message History* permission here."
                .to_string(),
        ),
        ErrorCategory::SummarizationFailed => (
            "❌ Summarization failed",
            CANONICAL_FAILURE_MESSAGE.to_string(),
        ),
        ErrorCategory::Internal => (
            "❌ Something went wrong",
            CANONICAL_FAILURE_MESSAGE.to_string(),
        ),
    };

    Reply {
        kind: ReplyKind::Error(category),
        title: title.to_string(),
        description,
        fields: Vec::new(),
        color: COLOR_ERROR,
    }
}

#[must_use]
pub fn render_help(prefix: &str) -> Reply {
    let examples = EXAMPLE_REQUESTS
        .iter()
        .map(|e| format!("• `{prefix}tldr {e}`"))
        .collect::<Vec<_>>()
        .join("\n");

    Reply {
        kind: ReplyKind::Help,
        title: "🤖 Discord TLDR Bot Help".to_string(),
        description:
            "Generate concise summaries of channel messages using natural language time requests."
                .to_string(),
        fields: vec![
            field("📝 Usage", format!("`{prefix}tldr <time request>`"), false),
            field("⏰ Time Request Examples", examples, false),
            field(
                "ℹ️ How it works",
                "The bot works out the time frame from your request, fetches the channel's \
                 messages from that window, and asks an AI model for a concise summary.",
                false,
            ),
        ],
        color: COLOR_HELP,
    }
}

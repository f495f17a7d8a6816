mod common;

use chrono_tz::Tz;
use common::at;
use tldr::TldrError;
use tldr::core::models::{ReplyKind, SummaryResult, TimeRange};
use tldr::errors::ErrorCategory;
use tldr::features::render::{
    EMBED_DESCRIPTION_LIMIT, render_empty, render_error, render_help, render_summary,
    truncate_chars,
};

fn result(text: &str, omitted: usize) -> SummaryResult {
    SummaryResult {
        text: text.to_string(),
        message_count: 12,
        record_count: 12,
        time_range: TimeRange::new(at(11, 0), at(12, 0)).unwrap(),
        omitted,
    }
}

#[test]
fn test_truncate_chars() {
    assert_eq!(truncate_chars("short", 10), "short");
    assert_eq!(truncate_chars("abcdef", 4), "abc…");
    // counts characters, not bytes
    assert_eq!(truncate_chars("ééééé", 5), "ééééé");
    assert_eq!(truncate_chars("éééééé", 5).chars().count(), 5);
}

#[test]
fn test_summary_description_fits_embed_limit() {
    let long = "word ".repeat(2000);
    let reply = render_summary(&result(&long, 0), "today", "!", Tz::UTC);

    assert_eq!(reply.kind, ReplyKind::Summary);
    assert_eq!(reply.description.chars().count(), EMBED_DESCRIPTION_LIMIT);
    assert!(reply.description.ends_with('…'));
    assert!(reply.field("Note").is_none());
}

#[test]
fn test_summary_fields_in_configured_timezone() {
    let reply = render_summary(
        &result("digest", 0),
        "last hour",
        "!",
        chrono_tz::America::New_York,
    );

    let time_frame = &reply.field("Time Frame").unwrap().value;
    assert_eq!(time_frame, "From: 2024-01-01 06:00 EST\nTo: 2024-01-01 07:00 EST");
    assert_eq!(reply.field("Messages Analyzed").unwrap().value, "12");
}

#[test]
fn test_omitted_records_add_note() {
    let reply = render_summary(&result("digest", 4), "last week", "?", Tz::UTC);

    let note = &reply.field("Note").unwrap().value;
    assert!(note.contains("The 4 oldest messages"));
    assert!(note.contains("`?tldr`"));
}

#[test]
fn test_request_backticks_are_neutralised() {
    let reply = render_summary(&result("digest", 0), "last `hour`", "!", Tz::UTC);
    assert_eq!(reply.field("Original Request").unwrap().value, "`last 'hour'`");
}

#[test]
fn test_empty_reply_shows_range() {
    let mut empty = result("No messages found in the specified time frame.", 0);
    empty.message_count = 0;
    empty.record_count = 0;

    let reply = render_empty(&empty, "last hour", Tz::UTC);

    assert_eq!(reply.kind, ReplyKind::Empty);
    assert!(reply.description.contains("2024-01-01 11:00 UTC"));
    assert!(reply.description.contains("2024-01-01 12:00 UTC"));
}

#[test]
fn test_error_replies_by_category() {
    let ambiguous = render_error(
        &TldrError::AmbiguousTimeRequest("no time reference".into()),
        "banana",
        "!",
    );
    assert_eq!(
        ambiguous.kind,
        ReplyKind::Error(ErrorCategory::AmbiguousTimeRequest)
    );
    assert!(ambiguous.description.contains("`banana`"));
    assert!(ambiguous.description.contains("`!tldr last hour`"));

    let history = render_error(&TldrError::HistoryUnavailable("403".into()), "today", "!");
    assert_eq!(history.title, "❌ History unavailable");
    assert!(!history.description.contains("403"));

    let internal = render_error(&TldrError::ConfigError("boom".into()), "today", "!");
    assert_eq!(internal.kind, ReplyKind::Error(ErrorCategory::Internal));
    assert!(!internal.description.contains("boom"));
}

#[test]
fn test_help_uses_prefix() {
    let reply = render_help("$");

    assert_eq!(reply.kind, ReplyKind::Help);
    assert_eq!(reply.field("Usage").unwrap().value, "`$tldr <time request>`");
    let examples = &reply.field("Examples").unwrap().value;
    assert!(examples.contains("`$tldr last hour`"));
    assert!(examples.contains("`$tldr yesterday`"));
}

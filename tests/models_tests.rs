mod common;

use common::at;
use tldr::core::models::{MessageRecord, TimeRange, Transcript};

fn record(minute: u32, content: &str) -> MessageRecord {
    MessageRecord {
        timestamp: at(11, minute),
        author_display_name: "alice".to_string(),
        content: content.to_string(),
    }
}

#[test]
fn test_time_range_rejects_inverted_bounds() {
    assert!(TimeRange::new(at(12, 0), at(11, 0)).is_err());

    let point = TimeRange::new(at(11, 0), at(11, 0)).unwrap();
    assert!(point.contains(at(11, 0)));
}

#[test]
fn test_time_range_deserialization_is_validated() {
    let inverted = r#"{"start":"2024-01-01T12:00:00Z","end":"2024-01-01T11:00:00Z"}"#;
    let err = serde_json::from_str::<TimeRange>(inverted).unwrap_err();
    assert!(err.to_string().contains("is after end"));

    let valid = r#"{"start":"2024-01-01T11:00:00Z","end":"2024-01-01T12:00:00Z"}"#;
    let range: TimeRange = serde_json::from_str(valid).unwrap();
    assert_eq!(range.start(), at(11, 0));
    assert_eq!(range.end(), at(12, 0));

    let encoded = serde_json::to_string(&range).unwrap();
    assert_eq!(serde_json::from_str::<TimeRange>(&encoded).unwrap(), range);
}

#[test]
fn test_transcript_orders_records_on_construction() {
    let transcript = Transcript::new(
        vec![record(5, "later"), record(1, "first"), record(5, "latest")],
        4,
    );

    let contents: Vec<&str> = transcript
        .records()
        .iter()
        .map(|r| r.content.as_str())
        .collect();
    assert_eq!(contents, ["first", "later", "latest"]);
    assert_eq!(transcript.message_count(), 4);
}

#[test]
fn test_keep_newest_preserves_message_count() {
    let transcript = Transcript::new(vec![record(1, "a"), record(2, "b"), record(3, "c")], 5);

    let kept = transcript.clone().keep_newest(2);
    assert_eq!(kept.len(), 2);
    assert_eq!(kept.records()[0].content, "b");
    assert_eq!(kept.message_count(), 5);

    assert_eq!(transcript.clone().keep_newest(10), transcript);
}

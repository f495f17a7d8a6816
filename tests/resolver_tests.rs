mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::{Answer, ScriptedModel, at};
use tldr::TldrError;
use tldr::features::resolve::{TimeRangeResolver, parse_time_range_response, quick_resolve};

fn resolver(answer: Answer) -> (Arc<ScriptedModel>, TimeRangeResolver) {
    let model = Arc::new(ScriptedModel::new(answer, Answer::Fail("unused".into())));
    let resolver = TimeRangeResolver::new(model.clone(), chrono_tz::Tz::UTC);
    (model, resolver)
}

#[tokio::test]
async fn test_last_hour_resolves_without_model() {
    let (model, resolver) = resolver(Answer::Fail("should not be called".into()));

    let range = resolver.resolve("last hour", at(12, 0)).await.unwrap();

    assert_eq!(range.start(), at(11, 0));
    assert_eq!(range.end(), at(12, 0));
    assert_eq!(model.calls().len(), 0);
}

#[test]
fn test_quick_resolve_phrases() {
    let reference = at(12, 0);
    let utc = chrono_tz::Tz::UTC;

    let range = quick_resolve("Last 3 Hours", reference, utc).unwrap();
    assert_eq!(range.start(), at(9, 0));

    let range = quick_resolve("past 15 minutes", reference, utc).unwrap();
    assert_eq!(range.start(), at(11, 45));

    let range = quick_resolve("the last day", reference, utc).unwrap();
    assert_eq!(
        range.start(),
        Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap()
    );

    let range = quick_resolve("today", reference, utc).unwrap();
    assert_eq!(range.start(), at(0, 0));
    assert_eq!(range.end(), reference);

    let range = quick_resolve("yesterday", reference, utc).unwrap();
    assert_eq!(
        range.start(),
        Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap()
    );
    assert!(range.end() < at(0, 0));
    assert!(range.contains(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()));

    assert!(quick_resolve("last 0 hours", reference, utc).is_none());
    assert!(quick_resolve("since the standup", reference, utc).is_none());
    assert!(quick_resolve("banana", reference, utc).is_none());
}

#[tokio::test]
async fn test_model_answer_is_used_for_other_phrases() {
    let (model, resolver) = resolver(Answer::Fixed(
        r#"{"start_time": "2024-01-01T09:30:00Z", "end_time": "2024-01-01T10:15:00Z"}"#.into(),
    ));

    let range = resolver
        .resolve("during the morning standup", at(12, 0))
        .await
        .unwrap();

    assert_eq!(range.start(), at(9, 30));
    assert_eq!(range.end(), at(10, 15));

    let calls = model.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].structured);
    assert!(calls[0].user_text.contains("REQUEST: during the morning standup"));
}

#[tokio::test]
async fn test_inverted_range_is_rejected_not_swapped() {
    let (_, resolver) = resolver(Answer::Fixed(
        r#"{"start_time": "2024-01-01T11:00:00Z", "end_time": "2024-01-01T10:00:00Z"}"#.into(),
    ));

    let err = resolver.resolve("since lunch", at(12, 0)).await.unwrap_err();
    assert!(matches!(err, TldrError::AmbiguousTimeRequest(_)));
}

#[tokio::test]
async fn test_unparsable_timestamp_is_rejected() {
    let (_, resolver) = resolver(Answer::Fixed(
        r#"{"start_time": "around noon", "end_time": "2024-01-01T10:00:00Z"}"#.into(),
    ));

    let err = resolver.resolve("since lunch", at(12, 0)).await.unwrap_err();
    assert!(matches!(err, TldrError::AmbiguousTimeRequest(_)));
}

#[tokio::test]
async fn test_no_time_reference_fails_fast() {
    let (_, resolver) = resolver(Answer::Fixed(
        r#"{"start_time": null, "end_time": null}"#.into(),
    ));

    let err = resolver.resolve("banana", at(12, 0)).await.unwrap_err();
    assert!(matches!(err, TldrError::AmbiguousTimeRequest(_)));
}

#[tokio::test]
async fn test_blank_request_never_reaches_model() {
    let (model, resolver) = resolver(Answer::Fail("should not be called".into()));

    let err = resolver.resolve("  \u{0007} ", at(12, 0)).await.unwrap_err();
    assert!(matches!(err, TldrError::AmbiguousTimeRequest(_)));
    assert_eq!(model.calls().len(), 0);
}

#[tokio::test]
async fn test_model_failure_maps_to_ambiguous_request() {
    let (_, resolver) = resolver(Answer::Fail("quota exceeded".into()));

    let err = resolver.resolve("since lunch", at(12, 0)).await.unwrap_err();
    match err {
        TldrError::AmbiguousTimeRequest(msg) => assert!(msg.contains("quota exceeded")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parse_response_variants() {
    let fenced = "```json\n{\"start_time\": \"2024-01-01T11:00:00Z\", \"end_time\": \"2024-01-01T12:00:00Z\"}\n```";
    let range = parse_time_range_response(fenced).unwrap();
    assert_eq!(range.start(), at(11, 0));

    // Equal bounds are a valid, degenerate range.
    let equal = r#"{"start_time": "2024-01-01T11:00:00Z", "end_time": "2024-01-01T11:00:00Z"}"#;
    let range = parse_time_range_response(equal).unwrap();
    assert_eq!(range.start(), range.end());

    for bad in [
        "not json at all",
        r#"{"start_time": "2024-01-01T11:00:00Z"}"#,
        r#"{"start_time": "2024-01-01T11:00:00Z", "end_time": null}"#,
    ] {
        assert!(
            matches!(
                parse_time_range_response(bad),
                Err(TldrError::AmbiguousTimeRequest(_))
            ),
            "should reject {bad}"
        );
    }
}

//! Time-range resolution: free-text phrase + reference time → [`TimeRange`].

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::ai::client::{CompletionRequest, LanguageModel};
use crate::ai::prompt_builder::{build_time_range_prompt, sanitize_request, time_range_schema};
use crate::core::models::TimeRange;
use crate::errors::TldrError;
use crate::utils::time::parse_timestamp;

static RELATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:the\s+)?(?:last|past)\s+(?:(\d{1,4}|a|an|one)\s+)?(minute|min|hour|hr|day|week)s?$",
    )
    .expect("static regex compile")
});

/// Shape the model is constrained to answer with.
#[derive(Debug, Deserialize)]
struct RawTimeRange {
    start_time: Option<String>,
    end_time: Option<String>,
}

pub struct TimeRangeResolver {
    model: Arc<dyn LanguageModel>,
    timezone: Tz,
}

impl TimeRangeResolver {
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>, timezone: Tz) -> Self {
        Self { model, timezone }
    }

    /// Resolve `request_text` against `reference_time`.
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousTimeRequest` when the phrase is blank, carries no time
    /// reference, the model answer does not parse, or start is after end.
    pub async fn resolve(
        &self,
        request_text: &str,
        reference_time: DateTime<Utc>,
    ) -> Result<TimeRange, TldrError> {
        let request = sanitize_request(request_text);
        if request.is_empty() {
            return Err(TldrError::AmbiguousTimeRequest(
                "empty time request".to_string(),
            ));
        }

        if let Some(range) = quick_resolve(&request, reference_time, self.timezone) {
            debug!("Resolved {:?} locally", request);
            return Ok(range);
        }

        let prompt = build_time_range_prompt(&request, reference_time, self.timezone);
        let answer = self
            .model
            .complete(CompletionRequest::structured(prompt, time_range_schema()))
            .await
            .map_err(|e| {
                warn!("Time-range model call failed: {}", e);
                TldrError::AmbiguousTimeRequest(format!("time parser unavailable: {e}"))
            })?;

        let range = parse_time_range_response(&answer)?;
        info!(
            "Resolved {:?} to {} .. {}",
            request,
            range.start().to_rfc3339(),
            range.end().to_rfc3339()
        );
        Ok(range)
    }
}

/// Strictly parse the model's JSON answer. Nothing is defaulted or swapped.
///
/// # Errors
///
/// Returns `AmbiguousTimeRequest` for malformed JSON, null or unparsable
/// fields, or a start later than the end.
pub fn parse_time_range_response(answer: &str) -> Result<TimeRange, TldrError> {
    let json_str = strip_code_fence(answer);
    let raw: RawTimeRange = serde_json::from_str(json_str).map_err(|e| {
        TldrError::AmbiguousTimeRequest(format!("unreadable time range answer: {e}"))
    })?;

    let (Some(start_raw), Some(end_raw)) = (raw.start_time, raw.end_time) else {
        return Err(TldrError::AmbiguousTimeRequest(
            "no time reference in request".to_string(),
        ));
    };

    let start = parse_timestamp(&start_raw).ok_or_else(|| {
        TldrError::AmbiguousTimeRequest(format!("invalid start_time {start_raw:?}"))
    })?;
    let end = parse_timestamp(&end_raw).ok_or_else(|| {
        TldrError::AmbiguousTimeRequest(format!("invalid end_time {end_raw:?}"))
    })?;

    TimeRange::new(start, end)
}

fn strip_code_fence(answer: &str) -> &str {
    let trimmed = answer.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Resolve common relative phrases without a model call.
///
/// Handles `last|past [N] minute|hour|day|week(s)`, `today` and `yesterday`.
/// Calendar phrases use midnight in `tz`.
#[must_use]
pub fn quick_resolve(request: &str, reference_time: DateTime<Utc>, tz: Tz) -> Option<TimeRange> {
    let phrase = request.trim().to_lowercase();

    match phrase.as_str() {
        "today" => {
            let start = local_midnight(reference_time, tz, 0)?;
            return TimeRange::new(start, reference_time).ok();
        }
        "yesterday" => {
            let start = local_midnight(reference_time, tz, 1)?;
            let end = local_midnight(reference_time, tz, 0)? - Duration::milliseconds(1);
            return TimeRange::new(start, end).ok();
        }
        _ => {}
    }

    let caps = RELATIVE_RE.captures(&phrase)?;
    let amount: i64 = match caps.get(1).map(|m| m.as_str()) {
        None | Some("a" | "an" | "one") => 1,
        Some(n) => n.parse().ok()?,
    };
    if amount == 0 {
        return None;
    }

    let span = match &caps[2] {
        "minute" | "min" => Duration::try_minutes(amount)?,
        "hour" | "hr" => Duration::try_hours(amount)?,
        "day" => Duration::try_days(amount)?,
        "week" => Duration::try_weeks(amount)?,
        _ => return None,
    };

    TimeRange::new(reference_time.checked_sub_signed(span)?, reference_time).ok()
}

/// Midnight `days_back` days before the reference date, in `tz`, as UTC.
fn local_midnight(reference_time: DateTime<Utc>, tz: Tz, days_back: u64) -> Option<DateTime<Utc>> {
    let date = reference_time
        .with_timezone(&tz)
        .date_naive()
        .checked_sub_days(chrono::Days::new(days_back))?;
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
}

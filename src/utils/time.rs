use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Milliseconds between the Unix epoch and the first second of 2015, the
/// origin of Discord snowflake timestamps.
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO-8601-like timestamp. Zone-less values are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Largest snowflake strictly older than every message sent at or after `ts`.
///
/// Used as an exclusive `after` cursor so a message stamped exactly `ts` is
/// still returned. Never returns 0 since Discord ids are non-zero. Instants
/// past the snowflake horizon saturate rather than wrap.
#[must_use]
pub fn snowflake_before(ts: DateTime<Utc>) -> u64 {
    let since_epoch = ts.timestamp_millis().saturating_sub(DISCORD_EPOCH_MS).max(0);
    let floor = u64::try_from(since_epoch)
        .ok()
        .and_then(|ms| ms.checked_mul(1 << 22))
        .unwrap_or(u64::MAX);
    floor.saturating_sub(1).max(1)
}

/// Creation time encoded in a Discord snowflake id.
#[must_use]
pub fn timestamp_from_snowflake(id: u64) -> DateTime<Utc> {
    let ms = i64::try_from(id >> 22).unwrap_or(i64::MAX) + DISCORD_EPOCH_MS;
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Render a timestamp in the configured zone, e.g. `2024-01-01 11:00 UTC`.
#[must_use]
pub fn format_in_zone(ts: DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string()
}

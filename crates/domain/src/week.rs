use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};

/// Most recent Sunday (inclusive) in the given reference offset.
///
/// The week key is a calendar date; 00:00 of that date in `zone` is the
/// instant the week began. Every caller on the same local calendar day
/// computes the same key.
pub fn week_start(now: DateTime<Utc>, zone: FixedOffset) -> NaiveDate {
    let local = now.with_timezone(&zone).date_naive();
    local - Duration::days(i64::from(local.weekday().num_days_from_sunday()))
}

//! Day and week arithmetic in a zone.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use super::zone::resolve_local;

/// ## Summary
/// Returns local midnight of the calendar day `datetime` falls on.
#[must_use]
pub fn start_of_day(datetime: &DateTime<Tz>) -> DateTime<Tz> {
    resolve_local(
        datetime.date_naive().and_time(NaiveTime::MIN),
        datetime.timezone(),
    )
}

/// ISO weekday number, 1 = Monday .. 7 = Sunday.
#[must_use]
pub fn week_day_number(date: NaiveDate) -> u8 {
    // number_from_monday is always 1..=7
    u8::try_from(date.weekday().number_from_monday()).unwrap_or(1)
}

/// ## Summary
/// Returns the most recent date whose weekday is `first_day` (1 = Monday .. 7 = Sunday),
/// at or before `date`.
#[must_use]
pub fn start_of_week_date(date: NaiveDate, first_day: u8) -> NaiveDate {
    let diff = (i64::from(week_day_number(date)) - i64::from(first_day)).rem_euclid(7);
    date - TimeDelta::days(diff)
}

/// ## Summary
/// Returns local midnight of the week start containing `datetime`.
#[must_use]
pub fn start_of_week(datetime: &DateTime<Tz>, first_day: u8) -> DateTime<Tz> {
    let date = start_of_week_date(datetime.date_naive(), first_day);
    resolve_local(date.and_time(NaiveTime::MIN), datetime.timezone())
}

/// ## Summary
/// Day bucket key of the calendar day `datetime` falls on: its local midnight forced to UTC,
/// in epoch milliseconds. Stable for a given zone regardless of DST.
#[must_use]
pub fn day_bucket_key<Z: TimeZone>(datetime: &DateTime<Z>) -> i64 {
    date_bucket_key(datetime.naive_local().date())
}

/// Bucket key of a calendar date, see [`day_bucket_key`].
#[must_use]
pub fn date_bucket_key(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Inverse of [`day_bucket_key`].
#[must_use]
pub fn date_from_bucket_key(key: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(key).map(|dt| dt.date_naive())
}

/// Whole calendar days from `from` to `to` (negative if `to` is earlier).
#[must_use]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[must_use]
pub fn minutes_since_midnight(datetime: &DateTime<Tz>) -> u32 {
    datetime.hour() * 60 + datetime.minute()
}

/// Compact UTC form used in occurrence ids, e.g. `20240501T090000Z`.
#[must_use]
pub fn compact_utc(datetime: DateTime<Utc>) -> String {
    datetime.format("%Y%m%dT%H%M%SZ").to_string()
}

/// ## Summary
/// Bucket keys of the days a week column strip shows: `number_of_days` days from
/// `week_start`, minus hidden weekdays.
#[must_use]
pub fn visible_week_days(
    week_start: NaiveDate,
    number_of_days: u8,
    hide_week_days: &[u8],
) -> Vec<i64> {
    (0..i64::from(number_of_days))
        .map(|offset| week_start + TimeDelta::days(offset))
        .filter(|date| !hide_week_days.contains(&week_day_number(*date)))
        .map(date_bucket_key)
        .collect()
}

//! Flexible date input parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::zone::resolve_local;
use crate::error::{RfcError, RfcResult};

/// Naive formats tried, in order, when an ISO string carries no offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Offset formats chrono's RFC 3339 parser rejects (`+0200`, no seconds).
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Anything a calendar host may hand over as a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    /// ISO 8601 date, date-time, or date-time with offset
    Iso(&'a str),
    /// Milliseconds since the Unix epoch
    Millis(i64),
    Instant(DateTime<Utc>),
    Zoned(DateTime<Tz>),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Iso(value)
    }
}

impl From<i64> for DateInput<'_> {
    fn from(value: i64) -> Self {
        Self::Millis(value)
    }
}

impl From<DateTime<Utc>> for DateInput<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

impl From<DateTime<Tz>> for DateInput<'_> {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Zoned(value)
    }
}

/// ## Summary
/// Parses a flexible date input into a zoned date-time in `zone`.
///
/// Strings with an explicit offset (`Z`, `+02:00`) denote that instant and are then viewed
/// in `zone`. Strings without one are wall-clock times in `zone`; a bare date is local midnight.
///
/// ## Errors
/// Returns `RfcError::InvalidDateTime` for unparseable strings or out-of-range epoch values.
pub fn parse<'a>(input: impl Into<DateInput<'a>>, zone: Tz) -> RfcResult<DateTime<Tz>> {
    match input.into() {
        DateInput::Iso(text) => parse_iso(text.trim(), zone),
        DateInput::Millis(millis) => Utc
            .timestamp_millis_opt(millis)
            .single()
            .map(|dt| dt.with_timezone(&zone))
            .ok_or_else(|| RfcError::InvalidDateTime(format!("epoch millis {millis}"))),
        DateInput::Instant(dt) => Ok(dt.with_timezone(&zone)),
        DateInput::Zoned(dt) => Ok(dt.with_timezone(&zone)),
    }
}

/// ## Summary
/// Parses the calendar date of an ISO string, ignoring any time or offset component.
///
/// ## Errors
/// Returns `RfcError::InvalidDateTime` if the string does not start with `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> RfcResult<NaiveDate> {
    let text = text.trim();
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_e| RfcError::InvalidDateTime(text.to_string()))
}

fn parse_iso(text: &str, zone: Tz) -> RfcResult<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&zone));
    }

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Ok(dt.with_timezone(&zone));
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Ok(resolve_local(naive, zone));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(|date| resolve_local(date.and_time(NaiveTime::MIN), zone))
        .map_err(|_e| RfcError::InvalidDateTime(text.to_string()))
}

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use timegrid_rfc::rfc::datetime::{
    day_bucket_key, parse, parse_date, resolve_local, zone_or_fallback,
};

use crate::error::{LayoutError, LayoutResult};

/// Start or end of an event: a calendar date (all-day) or a date-time with optional zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDate {
    DateTime {
        #[serde(rename = "dateTime")]
        date_time: String,
        /// IANA zone naive `date_time` values are read in; the active zone when absent
        #[serde(rename = "timeZone", default, skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
    },
    Date {
        date: String,
    },
}

impl EventDate {
    #[must_use]
    pub fn date_time(value: impl Into<String>) -> Self {
        Self::DateTime {
            date_time: value.into(),
            time_zone: None,
        }
    }

    #[must_use]
    pub fn date(value: impl Into<String>) -> Self {
        Self::Date { date: value.into() }
    }

    /// Timed value for an instant, keeping the zone annotation of the event it came from.
    #[must_use]
    pub fn from_instant(instant: DateTime<Utc>, time_zone: Option<String>) -> Self {
        Self::DateTime {
            date_time: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone,
        }
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self::Date {
            date: date.format("%Y-%m-%d").to_string(),
        }
    }

    #[must_use]
    pub const fn is_all_day(&self) -> bool {
        matches!(self, Self::Date { .. })
    }

    /// Zone a naive value is written in: its own `time_zone` when that resolves, else `zone`.
    #[must_use]
    pub fn source_zone(&self, zone: Tz) -> Tz {
        match self {
            Self::DateTime {
                time_zone: Some(tzid),
                ..
            } => zone_or_fallback(tzid, zone),
            _ => zone,
        }
    }

    /// ## Summary
    /// Resolves this value as a start instant in `zone`. A date is its local midnight.
    ///
    /// ## Errors
    /// Returns an error if the date or date-time string cannot be parsed.
    pub fn resolve_start(&self, zone: Tz) -> LayoutResult<DateTime<Tz>> {
        match self {
            Self::DateTime { date_time, .. } => {
                Ok(parse(date_time.as_str(), self.source_zone(zone))?.with_timezone(&zone))
            }
            Self::Date { date } => Ok(local_midnight(parse_date(date)?, zone)),
        }
    }

    /// ## Summary
    /// Resolves this value as an end instant in `zone`. Dates are inclusive, so a date
    /// ends at the following local midnight.
    ///
    /// ## Errors
    /// Returns an error if the date or date-time string cannot be parsed.
    pub fn resolve_end(&self, zone: Tz) -> LayoutResult<DateTime<Tz>> {
        match self {
            Self::DateTime { .. } => self.resolve_start(zone),
            Self::Date { date } => Ok(local_midnight(parse_date(date)? + TimeDelta::days(1), zone)),
        }
    }
}

fn local_midnight(date: NaiveDate, zone: Tz) -> DateTime<Tz> {
    resolve_local(date.and_time(NaiveTime::MIN), zone)
}

/// Whether an event is laid out in the time grid or the all-day bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Timed,
    AllDay,
}

/// An event definition exactly as the host hands it over.
///
/// Fields the engine does not know about are kept in `extra` and written back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// RFC 5545 `RRULE` value, with or without the `RRULE:` prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<String>,
    /// ISO instants (or dates, for all-day events) removed from the expansion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EventItem {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: None,
            end: None,
            title: None,
            color: None,
            recurrence_rule: None,
            exclude_dates: Vec::new(),
            resource_id: None,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn timed(id: impl Into<String>, start: &str, end: &str) -> Self {
        Self {
            start: Some(EventDate::date_time(start)),
            end: Some(EventDate::date_time(end)),
            ..Self::new(id)
        }
    }

    /// All-day event covering `start..=end`.
    #[must_use]
    pub fn all_day(id: impl Into<String>, start: &str, end: &str) -> Self {
        Self {
            start: Some(EventDate::date(start)),
            end: Some(EventDate::date(end)),
            ..Self::new(id)
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_recurrence(mut self, rule: impl Into<String>) -> Self {
        self.recurrence_rule = Some(rule.into());
        self
    }

    #[must_use]
    pub fn with_exclude_dates(mut self, dates: &[&str]) -> Self {
        self.exclude_dates = dates.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// `None` unless start and end are both dates or both date-times.
    #[must_use]
    pub const fn kind(&self) -> Option<EventKind> {
        match (&self.start, &self.end) {
            (Some(EventDate::DateTime { .. }), Some(EventDate::DateTime { .. })) => {
                Some(EventKind::Timed)
            }
            (Some(EventDate::Date { .. }), Some(EventDate::Date { .. })) => Some(EventKind::AllDay),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.recurrence_rule.is_some()
    }

    /// ## Summary
    /// Resolves start and end to instants in `zone`.
    ///
    /// ## Errors
    /// Returns `LayoutError::MalformedEvent` if the date shapes do not pair up, or a parse
    /// error if either value is unreadable.
    pub fn resolve_range(&self, zone: Tz) -> LayoutResult<(DateTime<Tz>, DateTime<Tz>)> {
        let (Some(start), Some(end), Some(_)) = (&self.start, &self.end, self.kind()) else {
            return Err(LayoutError::MalformedEvent(self.id.clone()));
        };

        Ok((start.resolve_start(zone)?, end.resolve_end(zone)?))
    }
}

/// One concrete occurrence of an [`EventItem`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInstance {
    #[serde(flatten)]
    pub event: EventItem,
    pub local_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_first_occurrence: Option<bool>,
    /// The recurring parent, its exclude list extended with this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_recurring_event: Option<Box<EventItem>>,
}

impl EventInstance {
    /// Id of the definition this instance was produced from.
    #[must_use]
    pub fn source_id(&self) -> &str {
        self.original_recurring_event
            .as_deref()
            .map_or(self.event.id.as_str(), |parent| parent.id.as_str())
    }
}

impl From<EventItem> for EventInstance {
    fn from(event: EventItem) -> Self {
        Self {
            local_id: event.id.clone(),
            event,
            is_first_occurrence: None,
            original_recurring_event: None,
        }
    }
}

/// Resolved timing of one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalTiming {
    pub start_unix: i64,
    pub end_unix: i64,
    /// Minutes for timed segments, visible days for all-day segments
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_minutes: Option<u32>,
    /// Bucket key of the week an all-day segment belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_start: Option<i64>,
}

/// A day (or week) segment of an occurrence, ready for packing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalEvent {
    #[serde(flatten)]
    pub instance: EventInstance,
    #[serde(rename = "_internal")]
    pub internal: InternalTiming,
}

impl InternalEvent {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.instance.event.id
    }

    #[must_use]
    pub fn local_id(&self) -> &str {
        &self.instance.local_id
    }

    #[must_use]
    pub fn source_id(&self) -> &str {
        self.instance.source_id()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.instance.event.title.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn resource_id(&self) -> Option<&str> {
        self.instance.event.resource_id.as_deref()
    }

    #[must_use]
    pub const fn start_unix(&self) -> i64 {
        self.internal.start_unix
    }

    #[must_use]
    pub const fn end_unix(&self) -> i64 {
        self.internal.end_unix
    }

    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.internal.duration
    }

    #[must_use]
    pub const fn week_start(&self) -> Option<i64> {
        self.internal.week_start
    }

    /// Half-open interval intersection of the two segments.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.end_unix() > other.start_unix() && self.start_unix() < other.end_unix()
    }

    /// Bucket key of the calendar day this segment starts on, in `zone`.
    #[must_use]
    pub fn day_key(&self, zone: Tz) -> Option<i64> {
        DateTime::<Utc>::from_timestamp_millis(self.start_unix())
            .map(|start| day_bucket_key(&start.with_timezone(&zone)))
    }
}

/// Horizontal placement of a timed segment within its day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum EventLayout {
    #[serde(rename_all = "camelCase")]
    Columns {
        index: usize,
        column_span: usize,
        total: usize,
    },
    #[serde(rename_all = "camelCase")]
    Cascade {
        width_percentage: f64,
        x_offset_percentage: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedEvent {
    #[serde(flatten)]
    pub event: InternalEvent,
    pub layout: EventLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_index: Option<usize>,
}

/// An all-day segment placed on a row of its week strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedAllDayEvent {
    #[serde(flatten)]
    pub event: InternalEvent,
    pub row_index: usize,
    /// Index into the week's visible days
    pub start_index: usize,
    pub column_span: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllDayLayout {
    pub packed_events: Vec<PackedAllDayEvent>,
    pub max_row_count: usize,
}

/// A column owner when the day view is split by resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Resource {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
        }
    }
}

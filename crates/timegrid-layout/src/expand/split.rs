//! Splitting occurrences into per-day (timed) and per-week (all-day) segments.

use chrono::{DateTime, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;
use timegrid_core::constants::{DAYS_IN_WEEK, MILLISECONDS_IN_MINUTE};
use timegrid_rfc::rfc::datetime::{
    date_bucket_key, days_between, minutes_since_midnight, resolve_local, start_of_week_date,
    week_day_number,
};

use crate::error::{LayoutError, LayoutResult};
use crate::event::{EventInstance, InternalEvent, InternalTiming};

/// ## Summary
/// Splits a timed occurrence into one segment per local calendar day it touches.
///
/// A single-day occurrence shorter than `min_duration_minutes` is stretched to it. Segments
/// after the first start at local midnight and carry a `local_id` suffixed with their start
/// instant. Their `duration` is wall-clock minutes, so a segment spanning a DST switch
/// reports the hours shown on the grid rather than the elapsed ones.
///
/// ## Errors
/// Returns `LayoutError::MalformedEvent` if the occurrence has no resolvable range or ends
/// before it starts.
pub fn divide_events(
    instance: &EventInstance,
    zone: Tz,
    min_duration_minutes: Option<u32>,
) -> LayoutResult<Vec<InternalEvent>> {
    let (start, end) = instance.event.resolve_range(zone)?;
    if end < start {
        return Err(LayoutError::MalformedEvent(instance.event.id.clone()));
    }

    let first_day = start.date_naive();
    let day_count = days_between(first_day, end.date_naive()) + 1;

    if day_count == 1 {
        let mut end_unix = end.timestamp_millis();
        let mut duration = elapsed_minutes(start.timestamp_millis(), end_unix);

        if let Some(min_minutes) = min_duration_minutes.filter(|min| duration < f64::from(*min)) {
            duration = f64::from(min_minutes);
            end_unix = start.timestamp_millis() + i64::from(min_minutes) * MILLISECONDS_IN_MINUTE;
        }

        return Ok(vec![segment(
            instance,
            instance.local_id.clone(),
            InternalTiming {
                start_unix: start.timestamp_millis(),
                end_unix,
                duration,
                start_minutes: Some(minutes_since_midnight(&start)),
                week_start: None,
            },
        )]);
    }

    let mut segments = Vec::new();
    for day in 0..day_count {
        let date = first_day + TimeDelta::days(day);
        let day_start = if day == 0 { start } else { local_midnight(date, zone) };
        let day_end = if day == day_count - 1 {
            end
        } else {
            local_midnight(date + TimeDelta::days(1), zone)
        };

        if day > 0 && day_end <= day_start {
            continue;
        }

        let mut duration =
            elapsed_minutes(day_start.timestamp_millis(), day_end.timestamp_millis());
        let local_id = if day == 0 {
            instance.local_id.clone()
        } else {
            duration += offset_shift_minutes(&day_start, &day_end);
            format!("{}_{}", instance.local_id, day_start.timestamp_millis())
        };

        segments.push(segment(
            instance,
            local_id,
            InternalTiming {
                start_unix: day_start.timestamp_millis(),
                end_unix: day_end.timestamp_millis(),
                duration,
                start_minutes: Some(minutes_since_midnight(&day_start)),
                week_start: None,
            },
        ));
    }

    tracing::trace!(
        local_id = %instance.local_id,
        segments = segments.len(),
        "Split multi-day event"
    );

    Ok(segments)
}

/// ## Summary
/// Splits an all-day occurrence into one segment per week it touches.
///
/// Segment bounds are day bucket keys (`end_unix` exclusive) clipped to the week, and
/// `duration` counts the days of the segment that are not in `hide_week_days`.
///
/// ## Errors
/// Returns `LayoutError::MalformedEvent` if the occurrence has no resolvable range or ends
/// before it starts.
pub fn divide_all_day_events(
    instance: &EventInstance,
    zone: Tz,
    first_day: u8,
    hide_week_days: &[u8],
) -> LayoutResult<Vec<InternalEvent>> {
    let (start, end) = instance.event.resolve_range(zone)?;
    if end < start {
        return Err(LayoutError::MalformedEvent(instance.event.id.clone()));
    }

    let start_date = start.date_naive();
    // `end` is exclusive, so an event ending at midnight does not touch that day
    let end_date = if end > start {
        (end - TimeDelta::milliseconds(1)).date_naive()
    } else {
        start_date
    };

    let mut segments = Vec::new();
    let mut week = start_of_week_date(start_date, first_day);

    while week <= end_date {
        let week_last = week + TimeDelta::days(i64::from(DAYS_IN_WEEK) - 1);
        let segment_start = start_date.max(week);
        let segment_end = end_date.min(week_last);

        let visible = segment_start
            .iter_days()
            .take_while(|date| *date <= segment_end)
            .filter(|date| !hide_week_days.contains(&week_day_number(*date)))
            .count();

        let start_unix = date_bucket_key(segment_start);
        let local_id = if segments.is_empty() {
            instance.local_id.clone()
        } else {
            format!("{}_{start_unix}", instance.local_id)
        };

        segments.push(segment(
            instance,
            local_id,
            InternalTiming {
                start_unix,
                end_unix: date_bucket_key(segment_end + TimeDelta::days(1)),
                duration: f64::from(u32::try_from(visible).unwrap_or(u32::MAX)),
                start_minutes: None,
                week_start: Some(date_bucket_key(week)),
            },
        ));

        week += TimeDelta::days(i64::from(DAYS_IN_WEEK));
    }

    Ok(segments)
}

fn segment(instance: &EventInstance, local_id: String, internal: InternalTiming) -> InternalEvent {
    InternalEvent {
        instance: EventInstance {
            local_id,
            ..instance.clone()
        },
        internal,
    }
}

fn local_midnight(date: NaiveDate, zone: Tz) -> DateTime<Tz> {
    resolve_local(date.and_time(NaiveTime::MIN), zone)
}

/// Elapsed minutes between two epoch-millisecond instants.
#[expect(clippy::cast_precision_loss, reason = "calendar spans are far below 2^52 ms")]
fn elapsed_minutes(start_unix: i64, end_unix: i64) -> f64 {
    (end_unix - start_unix) as f64 / MILLISECONDS_IN_MINUTE as f64
}

/// Change in UTC offset between two instants of the same zone, in minutes.
fn offset_shift_minutes<Z: TimeZone>(from: &DateTime<Z>, to: &DateTime<Z>) -> f64 {
    let from_offset = from.offset().fix().local_minus_utc();
    let to_offset = to.offset().fix().local_minus_utc();
    f64::from(to_offset - from_offset) / 60.0
}

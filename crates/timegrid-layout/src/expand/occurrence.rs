//! Recurrence expansion of a single event definition.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use chrono_tz::Tz;
use timegrid_rfc::rfc::datetime::{compact_utc, days_between, force_zone, parse};
use timegrid_rfc::rfc::recurrence::RecurrenceGenerator;

use crate::error::LayoutResult;
use crate::event::{EventDate, EventInstance, EventItem, EventKind, InternalEvent};

/// ## Summary
/// Expands `event` into the segments of every occurrence that can touch
/// `[min_unix, max_unix]`, passing each occurrence through `split`.
///
/// A non-recurring event is split as is. For a recurring one each occurrence gets the
/// original duration and date shape, an id of the form `{id}_{YYYYMMDDTHHMMSSZ}`, and a copy
/// of the parent whose exclude list names the occurrence. Timed events recur on UTC
/// instants, all-day events on calendar dates. `event` itself is never modified.
///
/// ## Errors
/// Propagates a malformed recurrence rule and any error returned by `split`. Exclude dates
/// that cannot be parsed are skipped with a warning.
pub fn process_event_occurrences<F>(
    event: &EventItem,
    min_unix: i64,
    max_unix: i64,
    zone: Tz,
    split: F,
) -> LayoutResult<Vec<InternalEvent>>
where
    F: Fn(&EventInstance, Tz) -> LayoutResult<Vec<InternalEvent>>,
{
    let Some(rule) = event.recurrence_rule.as_deref() else {
        return split(&EventInstance::from(event.clone()), zone);
    };

    let (start, end) = event.resolve_range(zone)?;
    let all_day = event.kind() == Some(EventKind::AllDay);
    let duration = end - start;
    let day_span = days_between(start.date_naive(), end.date_naive()) - 1;

    // All-day rules run on wall-clock dates so occurrences never drift across DST.
    let to_rule_time = |datetime: DateTime<Tz>| {
        if all_day {
            force_zone(&datetime, Tz::UTC).with_timezone(&Utc)
        } else {
            datetime.with_timezone(&Utc)
        }
    };

    // Naive excludes and a floating UNTIL are written in the event's own zone.
    let source_zone = event.start.as_ref().map_or(zone, |start| start.source_zone(zone));

    let exclude_dates: Vec<DateTime<Utc>> = event
        .exclude_dates
        .iter()
        .filter_map(|text| match parse(text.as_str(), source_zone) {
            Ok(datetime) => Some(to_rule_time(datetime.with_timezone(&zone))),
            Err(error) => {
                tracing::warn!(
                    event_id = %event.id,
                    exclude = %text,
                    %error,
                    "Skipping unreadable exclude date"
                );
                None
            }
        })
        .collect();

    let anchor = to_rule_time(start);
    let generator = if all_day {
        RecurrenceGenerator::new(rule, anchor, &exclude_dates)?
    } else {
        RecurrenceGenerator::new_in_zone(rule, anchor, &exclude_dates, source_zone)?
    };
    let first_occurrence = generator.first_occurrence();

    // Occurrences starting before the window can still run into it.
    let window_start = to_rule_time(parse(min_unix, zone)?) - duration;
    let window_end = to_rule_time(parse(max_unix, zone)?);

    let mut segments = Vec::new();
    for occurrence in generator.generate_occurrences(window_start, window_end) {
        let suffix = compact_utc(occurrence);
        let (occurrence_start, occurrence_end, exclude_token) = if all_day {
            let date = occurrence.date_naive();
            (
                EventDate::from_date(date),
                EventDate::from_date(date + TimeDelta::days(day_span)),
                date.format("%Y-%m-%d").to_string(),
            )
        } else {
            let time_zone = match &event.start {
                Some(EventDate::DateTime { time_zone, .. }) => time_zone.clone(),
                _ => None,
            };
            (
                EventDate::from_instant(occurrence, time_zone.clone()),
                EventDate::from_instant(occurrence + duration, time_zone),
                occurrence.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
        };

        let mut parent = event.clone();
        parent.exclude_dates.push(exclude_token);

        let id = format!("{}_{suffix}", event.id);
        let instance = EventInstance {
            local_id: id.clone(),
            event: EventItem {
                id,
                start: Some(occurrence_start),
                end: Some(occurrence_end),
                recurrence_rule: None,
                exclude_dates: Vec::new(),
                ..event.clone()
            },
            is_first_occurrence: Some(first_occurrence == Some(occurrence)),
            original_recurring_event: Some(Box::new(parent)),
        };

        segments.extend(split(&instance, zone)?);
    }

    tracing::trace!(event_id = %event.id, segments = segments.len(), "Expanded recurring event");

    Ok(segments)
}

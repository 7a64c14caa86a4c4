use chrono_tz::Tz;

use super::model::{EventItem, EventKind};

/// Events split by where they are laid out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredEvents {
    pub all_days: Vec<EventItem>,
    pub regular: Vec<EventItem>,
}

/// ## Summary
/// First pass over the host's event list: classifies each event as all-day or regular and
/// drops the ones that cannot be laid out in `[min_unix, max_unix]`.
///
/// Events whose start and end shapes do not pair up, or whose dates do not resolve, are
/// dropped with a warning. Recurring events skip the window check, their occurrences are
/// evaluated later. With `use_all_day_event` off, date-only events go to the time grid.
#[must_use]
pub fn filter_events(
    events: &[EventItem],
    use_all_day_event: bool,
    min_unix: i64,
    max_unix: i64,
    zone: Tz,
) -> FilteredEvents {
    let mut filtered = FilteredEvents::default();

    for event in events {
        let Some(kind) = event.kind() else {
            tracing::warn!(
                event_id = %event.id,
                "Dropping event: start and end must both be dates or both be date-times"
            );
            continue;
        };

        let (start, end) = match event.resolve_range(zone) {
            Ok(range) => range,
            Err(error) => {
                tracing::warn!(
                    event_id = %event.id,
                    %error,
                    "Dropping event with unreadable dates"
                );
                continue;
            }
        };

        if end < start {
            tracing::warn!(event_id = %event.id, "Dropping event that ends before it starts");
            continue;
        }

        if !event.is_recurring()
            && !intersects(start.timestamp_millis(), end.timestamp_millis(), min_unix, max_unix)
        {
            tracing::trace!(event_id = %event.id, "Event outside visible window");
            continue;
        }

        match kind {
            EventKind::AllDay if use_all_day_event => filtered.all_days.push(event.clone()),
            EventKind::AllDay | EventKind::Timed => filtered.regular.push(event.clone()),
        }
    }

    tracing::debug!(
        all_days = filtered.all_days.len(),
        regular = filtered.regular.len(),
        dropped = events.len() - filtered.all_days.len() - filtered.regular.len(),
        "Filtered events"
    );

    filtered
}

/// ## Summary
/// Whether `event` has to be considered for `[min_unix, max_unix]`: recurring events always,
/// others when their resolved range touches the window.
#[must_use]
pub fn is_in_window(event: &EventItem, min_unix: i64, max_unix: i64, zone: Tz) -> bool {
    if event.is_recurring() {
        return true;
    }

    event.resolve_range(zone).is_ok_and(|(start, end)| {
        intersects(start.timestamp_millis(), end.timestamp_millis(), min_unix, max_unix)
    })
}

const fn intersects(start: i64, end: i64, min_unix: i64, max_unix: i64) -> bool {
    start <= max_unix && end >= min_unix
}

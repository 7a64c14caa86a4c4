use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use timegrid_test::event::{EventInstance, EventItem, EventLayout, InternalEvent, PackedEvent};
use timegrid_test::expand::divide_events;
use timegrid_test::rfc::datetime::date_bucket_key;

/// Epoch milliseconds of an RFC 3339 string.
pub fn millis(value: &str) -> i64 {
    DateTime::parse_from_rfc3339(value)
        .unwrap_or_else(|err| panic!("Invalid RFC3339 datetime {value}: {err}"))
        .with_timezone(&Utc)
        .timestamp_millis()
}

/// Day bucket key of an ISO date.
pub fn day(value: &str) -> i64 {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .unwrap_or_else(|err| panic!("Invalid date {value}: {err}"));
    date_bucket_key(date)
}

pub fn may_window() -> (i64, i64) {
    (millis("2024-05-01T00:00:00Z"), millis("2024-06-01T00:00:00Z"))
}

pub fn split(event: EventItem, zone: Tz) -> Vec<InternalEvent> {
    divide_events(&EventInstance::from(event), zone, None).expect("split should succeed")
}

/// Timed segment on 2024-05-01 between two `HH:MM` times.
pub fn segment(id: &str, start: &str, end: &str) -> InternalEvent {
    let event = EventItem::timed(
        id,
        &format!("2024-05-01T{start}:00Z"),
        &format!("2024-05-01T{end}:00Z"),
    )
    .with_title(id);

    split(event, Tz::UTC).remove(0)
}

pub fn columns(packed: &PackedEvent) -> (usize, usize, usize) {
    match packed.layout {
        EventLayout::Columns {
            index,
            column_span,
            total,
        } => (index, column_span, total),
        EventLayout::Cascade { .. } => {
            panic!("expected column layout for {}", packed.event.local_id())
        }
    }
}

pub fn find<'a>(packed: &'a [PackedEvent], id: &str) -> &'a PackedEvent {
    packed
        .iter()
        .find(|p| p.event.id() == id)
        .unwrap_or_else(|| panic!("{id} not packed"))
}

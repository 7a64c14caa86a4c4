use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use timegrid_test::error::{LayoutError, RfcError};
use timegrid_test::event::{EventItem, InternalEvent};
use timegrid_test::expand::{divide_events, process_event_occurrences};
use timegrid_test::rfc::recurrence::RecurrenceGenerator;

use super::helpers::{may_window, millis};

fn utc(d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, d, h, 0, 0).unwrap()
}

#[test_log::test]
fn weekly_count_yields_three_occurrences() {
    let generator = RecurrenceGenerator::new("FREQ=WEEKLY;COUNT=3", utc(1, 9), &[]).unwrap();

    let occurrences = generator.generate_occurrences(utc(1, 0), utc(22, 0));

    assert_eq!(occurrences, vec![utc(1, 9), utc(8, 9), utc(15, 9)]);
}

#[test]
fn exact_exclusion_removes_only_that_instant() {
    let generator = RecurrenceGenerator::new("FREQ=WEEKLY", utc(1, 9), &[utc(8, 9)]).unwrap();

    let occurrences = generator.generate_occurrences(utc(1, 0), utc(31, 0));

    assert_eq!(occurrences, vec![utc(1, 9), utc(15, 9), utc(22, 9), utc(29, 9)]);
}

#[test]
fn near_miss_exclusion_is_ignored() {
    let generator = RecurrenceGenerator::new("FREQ=WEEKLY", utc(1, 9), &[utc(8, 10)]).unwrap();

    assert!(generator.generate_occurrences(utc(1, 0), utc(31, 0)).contains(&utc(8, 9)));
}

#[test]
fn expanded_occurrences_carry_the_parent() {
    let event = EventItem::timed("weekly", "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z")
        .with_recurrence("FREQ=WEEKLY;COUNT=3")
        .with_title("Planning");
    let (min, max) = may_window();

    let segments = process_event_occurrences(&event, min, max, Tz::UTC, |instance, zone| {
        divide_events(instance, zone, None)
    })
    .unwrap();

    let starts: Vec<i64> = segments.iter().map(InternalEvent::start_unix).collect();
    assert_eq!(
        starts,
        vec![
            millis("2024-05-01T09:00:00Z"),
            millis("2024-05-08T09:00:00Z"),
            millis("2024-05-15T09:00:00Z")
        ]
    );

    let firsts: Vec<Option<bool>> =
        segments.iter().map(|s| s.instance.is_first_occurrence).collect();
    assert_eq!(firsts, vec![Some(true), Some(false), Some(false)]);

    for segment in &segments {
        assert_eq!(segment.title(), "Planning");
        let parent = segment.instance.original_recurring_event.as_deref().unwrap();
        assert_eq!(parent.recurrence_rule.as_deref(), Some("FREQ=WEEKLY;COUNT=3"));
        assert_eq!(parent.exclude_dates.len(), 1);
    }
}

#[test]
fn malformed_rule_propagates() {
    let event = EventItem::timed("broken", "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z")
        .with_recurrence("FREQ=WEEKLY;BYDAY=XX");
    let (min, max) = may_window();

    let result = process_event_occurrences(&event, min, max, Tz::UTC, |instance, zone| {
        divide_events(instance, zone, None)
    });

    assert!(matches!(result, Err(LayoutError::RfcError(RfcError::RecurrenceRule(_)))));
}

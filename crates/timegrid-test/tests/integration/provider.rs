use std::sync::Arc;

use timegrid_test::config::LayoutConfig;
use timegrid_test::error::{CoreError, LayoutError};
use timegrid_test::event::EventItem;
use timegrid_test::provider::CalendarProvider;

use super::helpers::{columns, day, millis};

const EVENTS_JSON: &str = r#"[
    {"id": "a", "title": "Planning",
     "start": {"dateTime": "2024-05-01T10:00:00Z"}, "end": {"dateTime": "2024-05-01T11:00:00Z"}},
    {"id": "b",
     "start": {"dateTime": "2024-05-01T10:30:00Z"}, "end": {"dateTime": "2024-05-01T11:30:00Z"}},
    {"id": "night",
     "start": {"dateTime": "2024-05-02T22:00:00Z"}, "end": {"dateTime": "2024-05-03T02:00:00Z"}},
    {"id": "trip", "start": {"date": "2024-05-03"}, "end": {"date": "2024-05-07"}},
    {"id": "weekly",
     "start": {"dateTime": "2024-04-24T09:00:00Z"}, "end": {"dateTime": "2024-04-24T09:30:00Z"},
     "recurrenceRule": "FREQ=WEEKLY"},
    {"id": "broken", "start": {"date": "2024-05-01"}, "end": {"dateTime": "2024-05-01T10:00:00Z"}}
]"#;

fn window() -> (i64, i64) {
    (millis("2024-04-29T00:00:00Z"), millis("2024-05-12T23:59:59Z"))
}

fn load_events() -> Vec<EventItem> {
    serde_json::from_str(EVENTS_JSON).expect("fixture should deserialize")
}

#[test_log::test]
fn lays_out_a_two_week_window() -> anyhow::Result<()> {
    let mut provider = CalendarProvider::new(LayoutConfig::default())?;
    let (min, max) = window();

    assert!(provider.notify_data_changed(&load_events(), min, max)?);

    let may_first = provider.regular_events_for_day(day("2024-05-01")).expect("May 1 bucket");
    let ids: Vec<&str> = may_first.iter().map(|p| p.event.id()).collect();
    assert_eq!(ids, vec!["weekly_20240501T090000Z", "a", "b"]);
    assert_eq!(columns(&may_first[1]), (0, 1, 2));
    assert_eq!(columns(&may_first[2]), (1, 1, 2));

    assert!(provider.regular_events_for_day(day("2024-05-03")).is_some());
    assert!(provider.regular_events_for_day(day("2024-05-08")).is_some());

    let first_week = provider.all_day_events_for_week(day("2024-04-29")).expect("first week");
    let trip = &first_week.packed_events[0];
    assert_eq!((trip.start_index, trip.column_span), (4, 3));

    let second_week = provider.all_day_events_for_week(day("2024-05-06")).expect("second week");
    let trip_tail = &second_week.packed_events[0];
    assert_eq!((trip_tail.start_index, trip_tail.column_span), (0, 2));
    assert_ne!(trip_tail.event.local_id(), "trip");

    Ok(())
}

#[test]
fn hidden_weekend_narrows_all_day_columns() -> anyhow::Result<()> {
    let config = LayoutConfig {
        hide_week_days: vec![6, 7],
        ..LayoutConfig::default()
    };
    let mut provider = CalendarProvider::new(config)?;
    let (min, max) = window();

    provider.notify_data_changed(&load_events(), min, max)?;

    let first_week = provider.all_day_events_for_week(day("2024-04-29")).expect("first week");
    let trip = &first_week.packed_events[0];
    assert_eq!((trip.start_index, trip.column_span), (4, 1));
    assert!((trip.event.duration() - 1.0).abs() < f64::EPSILON);

    Ok(())
}

#[test]
fn recurring_events_follow_the_window() -> anyhow::Result<()> {
    let mut provider = CalendarProvider::new(LayoutConfig::default())?;
    let events = load_events();
    let (min, max) = window();
    provider.notify_data_changed(&events, min, max)?;
    let untouched = provider.regular_events_for_day(day("2024-05-02")).expect("May 2 bucket");

    let later = (millis("2024-05-06T00:00:00Z"), millis("2024-05-19T23:59:59Z"));
    assert!(provider.notify_data_changed(&events, later.0, later.1)?);

    assert!(provider.regular_events_for_day(day("2024-05-15")).is_some());
    assert!(provider.regular_events_for_day(day("2024-05-01")).is_none());
    assert!(provider.regular_events_for_day(day("2024-05-02")).is_none());
    assert!(!provider.regular_events().values().any(|bucket| Arc::ptr_eq(bucket, &untouched)));
    assert_eq!(provider.state().min_date_unix, later.0);

    Ok(())
}

#[test]
fn time_zone_change_rebuckets() -> anyhow::Result<()> {
    let mut provider = CalendarProvider::new(LayoutConfig::default())?;
    let events = load_events();
    let (min, max) = window();
    provider.notify_data_changed(&events, min, max)?;

    assert!(provider.set_time_zone("Asia/Tokyo"));
    assert!(provider.regular_events().is_empty());
    provider.notify_data_changed(&events, min, max)?;

    // 22:00 UTC is 07:00 the next morning in Tokyo, so the overnight event is a single day
    let night = provider
        .regular_events()
        .values()
        .flat_map(|bucket| bucket.iter())
        .filter(|p| p.event.id() == "night")
        .count();
    assert_eq!(night, 1);

    Ok(())
}

#[test]
fn invalid_configuration_fails_fast() {
    let config = LayoutConfig {
        hide_week_days: vec![1, 2, 3, 4, 5, 6, 7],
        ..LayoutConfig::default()
    };

    let result = CalendarProvider::new(config);

    assert!(matches!(result, Err(LayoutError::CoreError(CoreError::InvalidConfiguration(_)))));
}

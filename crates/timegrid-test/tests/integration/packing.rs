use timegrid_test::event::{EventLayout, InternalEvent, PackedEvent};
use timegrid_test::pack::{PopulateOptions, populate_events};
use timegrid_test::types::OverlapType;

use super::helpers::{columns, find, segment};

fn busy_day() -> Vec<InternalEvent> {
    vec![
        segment("standup", "09:00", "09:15"),
        segment("review", "09:00", "10:30"),
        segment("pairing", "09:10", "11:00"),
        segment("coffee", "09:15", "09:45"),
        segment("design", "10:00", "12:00"),
        segment("lunch", "12:00", "13:00"),
        segment("call", "12:30", "13:30"),
        segment("focus", "14:00", "17:00"),
        segment("sync", "14:00", "14:30"),
        segment("one-on-one", "15:00", "15:30"),
        segment("retro", "16:45", "17:45"),
    ]
}

fn no_overlap() -> PopulateOptions {
    PopulateOptions::default()
}

#[test]
fn two_overlapping_events_share_the_day() {
    let segments = [segment("A", "10:00", "11:00"), segment("B", "10:30", "11:30")];
    let packed = populate_events(&segments, &no_overlap());

    assert_eq!(columns(find(&packed, "A")), (0, 1, 2));
    assert_eq!(columns(find(&packed, "B")), (1, 1, 2));
}

#[test_log::test]
fn no_two_events_in_a_column_intersect() {
    let packed = populate_events(&busy_day(), &no_overlap());
    assert_eq!(packed.len(), busy_day().len());

    for (i, a) in packed.iter().enumerate() {
        for b in &packed[i + 1..] {
            let (a_index, _, a_total) = columns(a);
            let (b_index, _, b_total) = columns(b);
            if a_index == b_index && a_total == b_total && a.event.overlaps(&b.event) {
                panic!("{} and {} overlap in column {a_index}", a.event.id(), b.event.id());
            }
        }
    }
}

#[test]
fn column_span_stops_at_first_overlapping_column() {
    let packed = populate_events(&busy_day(), &no_overlap());

    for event in &packed {
        let (index, span, total) = columns(event);
        assert!(index + span <= total, "{} spans past the cluster", event.event.id());

        let column_overlaps = |column: usize| {
            packed.iter().any(|other| {
                let (other_index, _, other_total) = columns(other);
                other_index == column
                    && other_total == total
                    && cluster_of(&packed, other) == cluster_of(&packed, event)
                    && other.event.overlaps(&event.event)
            })
        };

        for column in index + 1..index + span {
            assert!(!column_overlaps(column), "{} spans over a busy column", event.event.id());
        }
        if index + span < total {
            assert!(column_overlaps(index + span), "{} could span further", event.event.id());
        }
    }
}

/// Start of the overlap cluster an event belongs to: the earliest start reachable through
/// a chain of overlapping events.
fn cluster_of(packed: &[PackedEvent], event: &PackedEvent) -> i64 {
    let mut start = event.event.start_unix();
    let mut end = event.event.end_unix();
    loop {
        let members: Vec<&PackedEvent> = packed
            .iter()
            .filter(|other| other.event.start_unix() < end && other.event.end_unix() > start)
            .collect();
        let next_start = members.iter().map(|m| m.event.start_unix()).min().unwrap_or(start);
        let next_end = members.iter().map(|m| m.event.end_unix()).max().unwrap_or(end);
        if (next_start, next_end) == (start, end) {
            return start;
        }
        (start, end) = (next_start, next_end);
    }
}

#[test]
fn repacking_the_same_input_is_stable() {
    let events = busy_day();

    for overlap_type in [OverlapType::NoOverlap, OverlapType::Overlap] {
        let options = PopulateOptions {
            overlap_type,
            min_start_difference: 15,
            resources: None,
        };
        assert_eq!(populate_events(&events, &options), populate_events(&events, &options));
    }
}

#[test]
fn overlap_mode_identical_starts() {
    let options = PopulateOptions {
        overlap_type: OverlapType::Overlap,
        min_start_difference: 15,
        resources: None,
    };

    let packed = populate_events(
        &[
            segment("first", "10:00", "11:00"),
            segment("second", "10:00", "11:00"),
            segment("third", "10:00", "11:00"),
        ],
        &options,
    );

    let geometry = |id: &str| match find(&packed, id).layout {
        EventLayout::Cascade {
            width_percentage,
            x_offset_percentage,
        } => (width_percentage, x_offset_percentage),
        EventLayout::Columns { .. } => panic!("expected cascade"),
    };

    // first is the container, second opens a row and third joins it as a leaf
    let (first_width, first_x) = geometry("first");
    let (second_width, second_x) = geometry("second");
    let (third_width, third_x) = geometry("third");

    let container = 100.0 / 3.0;
    let row = (100.0 - container) / 2.0;
    assert!((first_width - container * 1.7).abs() < 1e-9);
    assert!(first_x.abs() < 1e-9);
    assert!((second_x - container).abs() < 1e-9);
    assert!((second_width - row * 1.7).abs() < 1e-9);
    assert!((third_x - (container + row)).abs() < 1e-9);
    assert!((third_width - row).abs() < 1e-9);

    for (width, x) in [geometry("first"), geometry("second"), geometry("third")] {
        assert!(x + width <= 100.0 + 1e-9);
    }
}

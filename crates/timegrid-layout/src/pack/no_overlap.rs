//! Side-by-side column packing.

use std::cmp::Ordering;

use crate::event::{EventLayout, InternalEvent, PackedEvent};

/// ## Summary
/// Packs one day's segments into columns so that no two segments in a column intersect.
///
/// Segments are swept in start order. A run of mutually reachable overlaps forms a cluster;
/// each segment gets its column `index`, the cluster's column count as `total`, and a
/// `column_span` covering the following columns it can stretch into without hitting anything.
#[must_use]
pub fn pack_columns(events: &[InternalEvent]) -> Vec<PackedEvent> {
    let mut sorted: Vec<&InternalEvent> = events.iter().collect();
    sorted.sort_by(|a, b| compare_for_columns(a, b));

    let mut packed = Vec::with_capacity(events.len());
    let mut columns: Vec<Vec<&InternalEvent>> = Vec::new();
    let mut last_end: Option<i64> = None;

    for event in sorted {
        if last_end.is_some_and(|end| event.start_unix() >= end) {
            finalize_cluster(&columns, &mut packed);
            columns.clear();
            last_end = None;
        }

        match columns
            .iter_mut()
            .find(|column| column.last().is_none_or(|last| !last.overlaps(event)))
        {
            Some(column) => column.push(event),
            None => columns.push(vec![event]),
        }

        last_end = Some(last_end.map_or(event.end_unix(), |end| end.max(event.end_unix())));
    }

    finalize_cluster(&columns, &mut packed);

    packed
}

/// Start ascending, then title, then longer segments first.
fn compare_for_columns(a: &InternalEvent, b: &InternalEvent) -> Ordering {
    a.start_unix()
        .cmp(&b.start_unix())
        .then_with(|| compare_titles(a.title(), b.title()))
        .then_with(|| b.duration().total_cmp(&a.duration()))
}

pub(super) fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn finalize_cluster(columns: &[Vec<&InternalEvent>], packed: &mut Vec<PackedEvent>) {
    let total = columns.len();

    for (index, column) in columns.iter().enumerate() {
        for event in column {
            let free_columns = columns[index + 1..]
                .iter()
                .take_while(|other| !other.iter().any(|placed| placed.overlaps(event)))
                .count();

            packed.push(PackedEvent {
                event: (*event).clone(),
                layout: EventLayout::Columns {
                    index,
                    column_span: 1 + free_columns,
                    total,
                },
                resource_index: None,
            });
        }
    }
}

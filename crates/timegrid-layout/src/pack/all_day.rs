//! Row packing of all-day segments over a week strip.

use super::no_overlap::compare_titles;
use crate::event::{AllDayLayout, InternalEvent, PackedAllDayEvent};

/// ## Summary
/// Stacks one week's all-day segments into rows over `visible_days`.
///
/// `visible_days` are the week's shown day bucket keys, in order. A segment is placed on the
/// first row whose last segment it does not intersect; its `start_index` and `column_span`
/// refer to the visible days it touches. Segments that only cover hidden days are dropped.
#[must_use]
pub fn populate_all_day_events(events: &[InternalEvent], visible_days: &[i64]) -> AllDayLayout {
    let mut sorted: Vec<&InternalEvent> = events.iter().collect();
    sorted.sort_by(|a, b| {
        a.start_unix()
            .cmp(&b.start_unix())
            .then_with(|| b.duration().total_cmp(&a.duration()))
            .then_with(|| compare_titles(a.title(), b.title()))
    });

    let mut rows: Vec<&InternalEvent> = Vec::new();
    let mut packed_events = Vec::with_capacity(events.len());

    for event in sorted {
        let mut touched = visible_days
            .iter()
            .enumerate()
            .filter(|(_, day)| **day >= event.start_unix() && **day < event.end_unix())
            .map(|(index, _)| index);

        let Some(start_index) = touched.next() else {
            tracing::trace!(local_id = %event.local_id(), "All-day segment covers no visible day");
            continue;
        };
        let last_index = touched.last().unwrap_or(start_index);

        let row_index = if let Some(row) = rows.iter().position(|last| !last.overlaps(event)) {
            rows[row] = event;
            row
        } else {
            rows.push(event);
            rows.len() - 1
        };

        packed_events.push(PackedAllDayEvent {
            event: event.clone(),
            row_index,
            start_index,
            column_span: last_index - start_index + 1,
        });
    }

    AllDayLayout {
        packed_events,
        max_row_count: rows.len(),
    }
}

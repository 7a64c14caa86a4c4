//! Cascading container/row/leaf packing.

use std::collections::VecDeque;

use timegrid_core::constants::{MILLISECONDS_IN_MINUTE, OVERLAP_WIDTH_FACTOR};

use crate::event::{EventLayout, InternalEvent, PackedEvent};

const FULL_WIDTH: f64 = 100.0;

struct Row {
    start: i64,
    end: i64,
    item: usize,
    leaves: Vec<usize>,
}

struct Container {
    start: i64,
    end: i64,
    item: usize,
    rows: Vec<Row>,
}

/// ## Summary
/// Packs one day's segments into a cascading layout with percentage widths and offsets.
///
/// Each segment becomes a container, a row inside a container, or a leaf of a row, depending
/// on how it overlaps what came before. Starts within `min_start_difference` minutes of each
/// other count as simultaneous. Items with something cascading over them are drawn wider than
/// their share so that they stay readable underneath.
#[must_use]
pub fn pack_cascade(events: &[InternalEvent], min_start_difference: u32) -> Vec<PackedEvent> {
    let min_difference = i64::from(min_start_difference) * MILLISECONDS_IN_MINUTE;
    let ordered = interleave(events);

    let mut containers: Vec<Container> = Vec::new();
    for (item, event) in ordered.iter().enumerate() {
        let (start, end) = (event.start_unix(), event.end_unix());

        let Some(position) = containers
            .iter()
            .position(|c| c.end > start || (start - c.start).abs() <= min_difference)
        else {
            containers.push(Container {
                start,
                end,
                item,
                rows: Vec::new(),
            });
            continue;
        };

        let container = &mut containers[position];
        container.end = container.end.max(end);

        match container.rows.iter_mut().rev().find(|row| {
            (start - row.start).abs() <= min_difference || (start > row.start && start < row.end)
        }) {
            Some(row) => {
                row.leaves.push(item);
                row.end = row.end.max(end);
            }
            None => container.rows.push(Row {
                start,
                end,
                item,
                leaves: Vec::new(),
            }),
        }
    }

    let mut layouts: Vec<Option<EventLayout>> = vec![None; ordered.len()];
    for container in &containers {
        place_container(container, &mut layouts);
    }

    ordered
        .into_iter()
        .zip(layouts)
        .filter_map(|(event, layout)| {
            layout.map(|layout| PackedEvent {
                event: event.clone(),
                layout,
                resource_index: None,
            })
        })
        .collect()
}

/// Sorts by start (longer first on ties), then pulls the next sequential segment forward
/// after each one so that concurrent and back-to-back segments alternate.
fn interleave(events: &[InternalEvent]) -> Vec<&InternalEvent> {
    let mut sorted: Vec<&InternalEvent> = events.iter().collect();
    sorted.sort_by(|a, b| {
        a.start_unix()
            .cmp(&b.start_unix())
            .then_with(|| b.end_unix().cmp(&a.end_unix()))
    });

    let mut pending: VecDeque<&InternalEvent> = sorted.into();
    let mut ordered = Vec::with_capacity(pending.len());

    while let Some(event) = pending.pop_front() {
        ordered.push(event);
        if let Some(next) = pending
            .iter()
            .position(|candidate| candidate.start_unix() >= event.end_unix())
            .and_then(|position| pending.remove(position))
        {
            ordered.push(next);
        }
    }

    ordered
}

fn place_container(container: &Container, layouts: &mut [Option<EventLayout>]) {
    let widest_row = container
        .rows
        .iter()
        .map(|row| row.leaves.len() + 1)
        .max()
        .unwrap_or(0);
    let container_width = FULL_WIDTH / share_count(1 + widest_row);

    layouts[container.item] = Some(cascade(
        displayed_width(container_width, 0.0, !container.rows.is_empty()),
        0.0,
    ));

    for row in &container.rows {
        let row_offset = container_width;
        let row_width = (FULL_WIDTH - container_width) / share_count(row.leaves.len() + 1);

        layouts[row.item] = Some(cascade(
            displayed_width(row_width, row_offset, !row.leaves.is_empty()),
            row_offset,
        ));

        for (position, leaf) in row.leaves.iter().enumerate() {
            let offset = row_offset + row_width * share_count(position + 1);
            let is_last = position + 1 == row.leaves.len();
            layouts[*leaf] = Some(cascade(displayed_width(row_width, offset, !is_last), offset));
        }
    }
}

/// Width actually drawn: items with something over them are widened, never past the right edge.
fn displayed_width(width: f64, offset: f64, overlapped: bool) -> f64 {
    if overlapped {
        (width * OVERLAP_WIDTH_FACTOR).min(FULL_WIDTH - offset)
    } else {
        width
    }
}

const fn cascade(width_percentage: f64, x_offset_percentage: f64) -> EventLayout {
    EventLayout::Cascade {
        width_percentage,
        x_offset_percentage,
    }
}

fn share_count(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}

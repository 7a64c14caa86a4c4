//! Geometric packing of segments for rendering.

mod all_day;
mod no_overlap;
mod overlap;

pub use all_day::populate_all_day_events;
pub use no_overlap::pack_columns;
pub use overlap::pack_cascade;

use timegrid_core::types::OverlapType;

use crate::event::{InternalEvent, PackedEvent, Resource};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulateOptions {
    pub overlap_type: OverlapType,
    /// Minutes, used by [`OverlapType::Overlap`]
    pub min_start_difference: u32,
    /// When set, each resource gets its own packing run
    pub resources: Option<Vec<Resource>>,
}

/// ## Summary
/// Packs one day's timed segments with the configured overlap mode.
///
/// With resources configured, segments are grouped by `resource_id` and each group is packed
/// on its own, tagged with the resource's position. Segments for unknown resources are left out.
#[must_use]
pub fn populate_events(events: &[InternalEvent], options: &PopulateOptions) -> Vec<PackedEvent> {
    let Some(resources) = &options.resources else {
        return pack(events, options);
    };

    let mut packed = Vec::with_capacity(events.len());
    for (resource_index, resource) in resources.iter().enumerate() {
        let group: Vec<InternalEvent> = events
            .iter()
            .filter(|event| event.resource_id() == Some(resource.id.as_str()))
            .cloned()
            .collect();

        packed.extend(pack(&group, options).into_iter().map(|event| PackedEvent {
            resource_index: Some(resource_index),
            ..event
        }));
    }

    if packed.len() < events.len() {
        tracing::debug!(
            skipped = events.len() - packed.len(),
            "Segments without a known resource left out"
        );
    }

    packed
}

fn pack(events: &[InternalEvent], options: &PopulateOptions) -> Vec<PackedEvent> {
    match options.overlap_type {
        OverlapType::NoOverlap => pack_columns(events),
        OverlapType::Overlap => pack_cascade(events, options.min_start_difference),
    }
}

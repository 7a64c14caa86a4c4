use std::collections::{BTreeMap, HashSet};

use chrono_tz::Tz;

use crate::event::{EventItem, is_in_window};

/// Classification of a new event list against the last one seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub added: Vec<EventItem>,
    pub updated: Vec<EventItem>,
    /// Ids that were cached but are gone from the window
    pub deleted: Vec<String>,
    pub unchanged: Vec<String>,
}

impl EventChanges {
    /// `true` when nothing has to be recomputed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// ## Summary
/// Diffs `events` restricted to `[min_unix, max_unix]` against `event_map`.
///
/// Recurring events are always reported as updated, since what they expand to depends on
/// the window and not only on their content. A repeated id keeps its first definition.
pub(super) fn diff_events(
    event_map: &BTreeMap<String, EventItem>,
    events: &[EventItem],
    min_unix: i64,
    max_unix: i64,
    zone: Tz,
) -> EventChanges {
    let mut changes = EventChanges::default();
    let mut seen: HashSet<&str> = HashSet::with_capacity(events.len());

    for event in events {
        if !is_in_window(event, min_unix, max_unix, zone) {
            continue;
        }

        if !seen.insert(event.id.as_str()) {
            tracing::warn!(
                event_id = %event.id,
                "Duplicate event id, keeping the first definition"
            );
            continue;
        }

        match event_map.get(&event.id) {
            None => changes.added.push(event.clone()),
            Some(cached) if cached != event || event.is_recurring() => {
                changes.updated.push(event.clone());
            }
            Some(_) => changes.unchanged.push(event.id.clone()),
        }
    }

    changes.deleted = event_map
        .keys()
        .filter(|id| !seen.contains(id.as_str()))
        .cloned()
        .collect();

    changes
}

//! Incremental cache of packed day buckets.
//!
//! Buckets are keyed by day bucket key and handed out as `Arc`s. A recompute only replaces
//! the buckets it touched, so callers can tell unchanged days apart with `Arc::ptr_eq`.

mod diff;

pub use diff::EventChanges;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono_tz::Tz;

use crate::error::LayoutResult;
use crate::event::{EventItem, InternalEvent, PackedEvent};
use crate::expand::{divide_events, process_event_occurrences};
use crate::pack::{PopulateOptions, populate_events};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheOptions {
    pub populate: PopulateOptions,
    /// Timed single-day segments shorter than this are stretched
    pub min_regular_event_minutes: u32,
}

/// Regular (timed) events of one calendar, expanded, split and packed per day.
#[derive(Debug)]
pub struct EventCache {
    time_zone: Tz,
    options: CacheOptions,
    event_map: BTreeMap<String, EventItem>,
    regular_events: BTreeMap<i64, Arc<Vec<PackedEvent>>>,
}

impl EventCache {
    #[must_use]
    pub const fn new(time_zone: Tz, options: CacheOptions) -> Self {
        Self {
            time_zone,
            options,
            event_map: BTreeMap::new(),
            regular_events: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn time_zone(&self) -> Tz {
        self.time_zone
    }

    #[must_use]
    pub const fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// ## Summary
    /// Switches the active zone. Every bucket key depends on it, so the cache is cleared
    /// when the zone actually changes.
    pub fn set_time_zone(&mut self, time_zone: Tz) -> bool {
        if time_zone == self.time_zone {
            return false;
        }

        tracing::debug!(
            from = %self.time_zone,
            to = %time_zone,
            "Time zone changed, clearing event cache"
        );
        self.time_zone = time_zone;
        self.reset();
        true
    }

    /// Replaces the packing options and clears the cache if they differ.
    pub fn set_options(&mut self, options: CacheOptions) {
        if options != self.options {
            self.options = options;
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.event_map.clear();
        self.regular_events.clear();
    }

    #[must_use]
    pub const fn regular_events(&self) -> &BTreeMap<i64, Arc<Vec<PackedEvent>>> {
        &self.regular_events
    }

    #[must_use]
    pub fn events_for_day(&self, day_key: i64) -> Option<Arc<Vec<PackedEvent>>> {
        self.regular_events.get(&day_key).cloned()
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.event_map.len()
    }

    /// ## Summary
    /// Classifies `events` against the cached definitions for `[min_unix, max_unix]`.
    #[must_use]
    pub fn get_event_changes(
        &self,
        events: &[EventItem],
        min_unix: i64,
        max_unix: i64,
    ) -> EventChanges {
        diff::diff_events(&self.event_map, events, min_unix, max_unix, self.time_zone)
    }

    /// ## Summary
    /// Applies `changes` and repacks the day buckets they affect.
    ///
    /// Only added and updated events are expanded. Buckets holding segments of an added,
    /// updated or deleted event are rebuilt without them, merged with the fresh segments
    /// and repacked; every other bucket is kept as the same `Arc`. Empty buckets are dropped.
    ///
    /// Returns `false` when `changes` is empty and nothing was recomputed.
    ///
    /// ## Errors
    /// Propagates recurrence rule and split errors. The cache is left untouched on error.
    pub fn update_event_cache(
        &mut self,
        changes: &EventChanges,
        min_unix: i64,
        max_unix: i64,
    ) -> LayoutResult<bool> {
        if changes.is_empty() {
            tracing::debug!(unchanged = changes.unchanged.len(), "Event cache hit");
            return Ok(false);
        }

        let zone = self.time_zone;
        let min_minutes = self.options.min_regular_event_minutes;

        let mut fresh: BTreeMap<i64, Vec<InternalEvent>> = BTreeMap::new();
        for event in changes.added.iter().chain(&changes.updated) {
            let segments =
                process_event_occurrences(event, min_unix, max_unix, zone, |instance, zone| {
                    divide_events(instance, zone, Some(min_minutes))
                })?;

            for segment in segments {
                if let Some(day) = segment.day_key(zone) {
                    fresh.entry(day).or_default().push(segment);
                }
            }
        }

        for id in &changes.deleted {
            self.event_map.remove(id);
        }
        for event in changes.added.iter().chain(&changes.updated) {
            self.event_map.insert(event.id.clone(), event.clone());
        }

        let stale: HashSet<&str> = changes
            .added
            .iter()
            .chain(&changes.updated)
            .map(|event| event.id.as_str())
            .chain(changes.deleted.iter().map(String::as_str))
            .collect();

        let mut repacked = 0_usize;
        let mut buckets = BTreeMap::new();

        for (day, bucket) in &self.regular_events {
            let additions = fresh.remove(day);
            let touched = bucket.iter().any(|packed| stale.contains(packed.event.source_id()));

            if !touched && additions.is_none() {
                buckets.insert(*day, Arc::clone(bucket));
                continue;
            }

            let mut events: Vec<InternalEvent> = bucket
                .iter()
                .filter(|packed| !stale.contains(packed.event.source_id()))
                .map(|packed| packed.event.clone())
                .collect();
            events.extend(additions.unwrap_or_default());

            if !events.is_empty() {
                buckets.insert(*day, Arc::new(populate_events(&events, &self.options.populate)));
                repacked += 1;
            }
        }

        for (day, events) in fresh {
            buckets.insert(day, Arc::new(populate_events(&events, &self.options.populate)));
            repacked += 1;
        }

        tracing::debug!(
            added = changes.added.len(),
            updated = changes.updated.len(),
            deleted = changes.deleted.len(),
            repacked,
            buckets = buckets.len(),
            "Event cache updated"
        );

        self.regular_events = buckets;

        Ok(true)
    }
}

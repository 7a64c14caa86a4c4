//! The calendar-facing entry point that owns the engine state for one calendar.

mod debounce;

pub use debounce::Debouncer;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono_tz::Tz;
use timegrid_core::config::LayoutConfig;
use timegrid_core::constants::{DAYS_IN_WEEK, MILLISECONDS_IN_DAY};
use timegrid_core::error::CoreError;
use timegrid_core::store::{Store, SubscriptionId};
use timegrid_rfc::rfc::datetime::{
    TimeZoneResolver, date_from_bucket_key, day_bucket_key, parse, visible_week_days,
};

use crate::cache::{CacheOptions, EventCache};
use crate::error::LayoutResult;
use crate::event::{AllDayLayout, EventItem, InternalEvent, PackedEvent, Resource, filter_events};
use crate::expand::{divide_all_day_events, process_event_occurrences};
use crate::pack::{PopulateOptions, populate_all_day_events};

/// What subscribers are told after each recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    pub time_zone: Tz,
    pub min_date_unix: i64,
    pub max_date_unix: i64,
    /// Bumped whenever the packed output changes
    pub revision: u64,
}

/// Visible date range requested by the host, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    pub min_date_unix: i64,
    pub max_date_unix: i64,
}

/// Layout engine state for one calendar view.
#[derive(Debug)]
pub struct CalendarProvider {
    config: LayoutConfig,
    resolver: TimeZoneResolver,
    cache: EventCache,
    all_day_weeks: BTreeMap<i64, Arc<AllDayLayout>>,
    store: Store<LayoutState>,
    debouncer: Debouncer<VisibleWindow>,
}

impl CalendarProvider {
    /// ## Summary
    /// Builds a provider from a calendar configuration.
    ///
    /// An unknown `time_zone` falls back to UTC with a warning.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if the configuration breaks a hard invariant,
    /// such as more than seven visible days.
    pub fn new(config: LayoutConfig) -> LayoutResult<Self> {
        config.validate()?;

        let mut resolver = TimeZoneResolver::new();
        let time_zone = resolver.resolve_or_default(&config.time_zone, Tz::UTC);

        let options = CacheOptions {
            populate: PopulateOptions {
                overlap_type: config.overlap_type,
                min_start_difference: config.min_start_difference,
                resources: None,
            },
            min_regular_event_minutes: config.min_regular_event_minutes,
        };

        tracing::debug!(
            time_zone = %time_zone,
            overlap_type = %config.overlap_type,
            number_of_days = config.number_of_days,
            "Calendar provider created"
        );

        Ok(Self {
            resolver,
            cache: EventCache::new(time_zone, options),
            all_day_weeks: BTreeMap::new(),
            store: Store::new(LayoutState {
                time_zone,
                min_date_unix: 0,
                max_date_unix: 0,
                revision: 0,
            }),
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[must_use]
    pub const fn time_zone(&self) -> Tz {
        self.cache.time_zone()
    }

    #[must_use]
    pub const fn state(&self) -> &LayoutState {
        self.store.get_state()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&LayoutState) + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// ## Summary
    /// Switches the zone the grid is rendered in, falling back to UTC for unknown zones.
    ///
    /// Returns `true` if the zone changed; all cached layout is dropped in that case and the
    /// next [`Self::notify_data_changed`] recomputes everything.
    pub fn set_time_zone(&mut self, tzid: &str) -> bool {
        let time_zone = self.resolver.resolve_or_default(tzid, Tz::UTC);
        if !self.cache.set_time_zone(time_zone) {
            return false;
        }

        self.all_day_weeks.clear();
        self.store.set_state(|state| {
            state.time_zone = time_zone;
            state.revision += 1;
        });
        true
    }

    /// Packs each resource's events separately, or everything together with `None`.
    pub fn set_resources(&mut self, resources: Option<Vec<Resource>>) {
        let mut options = self.cache.options().clone();
        options.populate.resources = resources;
        self.cache.set_options(options);
    }

    /// ## Summary
    /// Lays out `events` for `[min_date_unix, max_date_unix]`.
    ///
    /// Timed events go through the diff cache, so only the days touched by added, updated or
    /// deleted events are repacked. All-day events are laid out per week; weeks whose layout
    /// did not change keep their previous `Arc`. Subscribers are notified when the output
    /// or the window changed.
    ///
    /// Returns whether any packed output changed.
    ///
    /// ## Errors
    /// Propagates invalid recurrence rules. The previous layout is kept in that case.
    pub fn notify_data_changed(
        &mut self,
        events: &[EventItem],
        min_date_unix: i64,
        max_date_unix: i64,
    ) -> LayoutResult<bool> {
        let zone = self.time_zone();
        let filtered = filter_events(
            events,
            self.config.use_all_day_event,
            min_date_unix,
            max_date_unix,
            zone,
        );

        let all_day_weeks =
            self.layout_all_day_weeks(&filtered.all_days, min_date_unix, max_date_unix)?;

        let changes = self
            .cache
            .get_event_changes(&filtered.regular, min_date_unix, max_date_unix);
        let regular_changed = self
            .cache
            .update_event_cache(&changes, min_date_unix, max_date_unix)?;

        let all_day_changed = all_day_weeks.len() != self.all_day_weeks.len()
            || all_day_weeks.iter().any(|(week, layout)| {
                self.all_day_weeks
                    .get(week)
                    .is_none_or(|prev| !Arc::ptr_eq(prev, layout))
            });
        self.all_day_weeks = all_day_weeks;

        let changed = regular_changed || all_day_changed;
        let window_moved = {
            let state = self.store.get_state();
            state.min_date_unix != min_date_unix || state.max_date_unix != max_date_unix
        };

        if changed || window_moved {
            self.store.set_state(|state| {
                state.min_date_unix = min_date_unix;
                state.max_date_unix = max_date_unix;
                if changed {
                    state.revision += 1;
                }
            });
        }

        Ok(changed)
    }

    /// Queues a window change; it is applied by [`Self::poll_window`] once the host stops
    /// scrolling for the configured debounce delay.
    pub fn schedule_window(&mut self, now: Instant, window: VisibleWindow) {
        self.debouncer.notify(now, window);
    }

    /// ## Summary
    /// Applies the queued window if the debounce delay has elapsed.
    ///
    /// ## Errors
    /// See [`Self::notify_data_changed`].
    pub fn poll_window(&mut self, now: Instant, events: &[EventItem]) -> LayoutResult<bool> {
        match self.debouncer.poll(now) {
            Some(window) => {
                self.notify_data_changed(events, window.min_date_unix, window.max_date_unix)
            }
            None => Ok(false),
        }
    }

    #[must_use]
    pub const fn regular_events(&self) -> &BTreeMap<i64, Arc<Vec<PackedEvent>>> {
        self.cache.regular_events()
    }

    #[must_use]
    pub fn regular_events_for_day(&self, day_key: i64) -> Option<Arc<Vec<PackedEvent>>> {
        self.cache.events_for_day(day_key)
    }

    #[must_use]
    pub const fn all_day_weeks(&self) -> &BTreeMap<i64, Arc<AllDayLayout>> {
        &self.all_day_weeks
    }

    #[must_use]
    pub fn all_day_events_for_week(&self, week_key: i64) -> Option<Arc<AllDayLayout>> {
        self.all_day_weeks.get(&week_key).cloned()
    }

    fn layout_all_day_weeks(
        &self,
        events: &[EventItem],
        min_date_unix: i64,
        max_date_unix: i64,
    ) -> LayoutResult<BTreeMap<i64, Arc<AllDayLayout>>> {
        let zone = self.time_zone();
        let first_day = self.config.first_day;
        let hidden = &self.config.hide_week_days;

        let first_visible = day_bucket_key(&parse(min_date_unix, zone)?);
        let last_visible = day_bucket_key(&parse(max_date_unix, zone)?);
        let week_length = i64::from(DAYS_IN_WEEK) * MILLISECONDS_IN_DAY;

        let mut weeks: BTreeMap<i64, Vec<InternalEvent>> = BTreeMap::new();
        for event in events {
            let segments = process_event_occurrences(
                event,
                min_date_unix,
                max_date_unix,
                zone,
                |instance, zone| divide_all_day_events(instance, zone, first_day, hidden),
            )?;

            for segment in segments {
                let Some(week) = segment.week_start() else {
                    continue;
                };
                if week <= last_visible && week + week_length > first_visible {
                    weeks.entry(week).or_default().push(segment);
                }
            }
        }

        let mut layouts = BTreeMap::new();
        for (week, segments) in weeks {
            let week_date = date_from_bucket_key(week)
                .ok_or(CoreError::InvariantViolation("week key out of range"))?;
            let visible_days = visible_week_days(week_date, self.config.number_of_days, hidden);
            let layout = populate_all_day_events(&segments, &visible_days);

            let layout = match self.all_day_weeks.get(&week) {
                Some(previous) if **previous == layout => Arc::clone(previous),
                _ => Arc::new(layout),
            };
            layouts.insert(week, layout);
        }

        tracing::debug!(weeks = layouts.len(), "All-day weeks laid out");

        Ok(layouts)
    }
}

use std::collections::BTreeMap;

use serde::Serialize;
use timegrid_layout::event::{AllDayLayout, PackedEvent};
use timegrid_layout::provider::CalendarProvider;
use timegrid_rfc::rfc::datetime::date_from_bucket_key;

/// Everything the provider laid out, keyed by ISO date.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport<'a> {
    pub time_zone: String,
    pub min_date_unix: i64,
    pub max_date_unix: i64,
    pub days: BTreeMap<String, &'a [PackedEvent]>,
    /// Keyed by the first day of each week
    pub all_day_weeks: BTreeMap<String, &'a AllDayLayout>,
}

impl<'a> LayoutReport<'a> {
    #[must_use]
    pub fn from_provider(provider: &'a CalendarProvider) -> Self {
        let state = provider.state();

        Self {
            time_zone: state.time_zone.to_string(),
            min_date_unix: state.min_date_unix,
            max_date_unix: state.max_date_unix,
            days: provider
                .regular_events()
                .iter()
                .map(|(day, bucket)| (date_label(*day), bucket.as_slice()))
                .collect(),
            all_day_weeks: provider
                .all_day_weeks()
                .iter()
                .map(|(week, layout)| (date_label(*week), layout.as_ref()))
                .collect(),
        }
    }
}

fn date_label(bucket_key: i64) -> String {
    date_from_bucket_key(bucket_key).map_or_else(|| bucket_key.to_string(), |date| date.to_string())
}

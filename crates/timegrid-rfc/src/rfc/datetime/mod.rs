//! Timezone-aware date handling.
//!
//! Everything the layout engine knows about wall-clock time goes through here:
//! flexible input parsing, zone resolution, zone-forcing and week/day arithmetic.

mod calendar;
mod parse;
mod zone;

pub use calendar::{
    compact_utc, date_bucket_key, date_from_bucket_key, day_bucket_key, days_between,
    minutes_since_midnight, start_of_day, start_of_week, start_of_week_date, visible_week_days,
    week_day_number,
};
pub use parse::{DateInput, parse, parse_date};
pub use zone::{TimeZoneResolver, force_zone, resolve_local, zone_or_fallback};

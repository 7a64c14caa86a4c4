//! Turning event definitions into day and week segments.

mod occurrence;
mod split;

pub use occurrence::process_event_occurrences;
pub use split::{divide_all_day_events, divide_events};

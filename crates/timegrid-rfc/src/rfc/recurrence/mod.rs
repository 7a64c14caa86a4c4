//! RFC 5545 recurrence expansion.
//!
//! Wraps the `rrule` crate: a rule string anchored at an event start, minus exclusion
//! instants, queried for the occurrences that fall inside a visible window.

mod generator;

pub use generator::RecurrenceGenerator;

//! Event layout and occurrence-expansion engine for day/week calendar grids.
//!
//! Raw event definitions flow through [`event::filter_events`], the occurrence expander
//! and day splitter in [`expand`], get bucketed by day and packed into columns by [`pack`].
//! [`cache::EventCache`] keeps the packed buckets between passes and only recomputes
//! what a diff says changed; [`provider::CalendarProvider`] ties it together.

pub mod cache;
pub mod error;
pub mod event;
pub mod expand;
pub mod pack;
pub mod provider;

//! Date-time, timezone and RFC 5545 recurrence primitives for the timegrid layout engine.

pub mod error;
pub mod rfc;

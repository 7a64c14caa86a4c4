pub mod datetime;
pub mod recurrence;

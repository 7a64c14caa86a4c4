use thiserror::Error;

/// Date-time, timezone and recurrence errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid recurrence rule: {0}")]
    RecurrenceRule(#[from] rrule::RRuleError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;

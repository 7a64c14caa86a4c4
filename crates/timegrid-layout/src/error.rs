use thiserror::Error;

/// Layout engine errors - combines the lower layers
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    RfcError(#[from] timegrid_rfc::error::RfcError),

    #[error(transparent)]
    CoreError(#[from] timegrid_core::error::CoreError),

    #[error("Malformed event {0}: start and end must both be dates or both be date-times")]
    MalformedEvent(String),
}

pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

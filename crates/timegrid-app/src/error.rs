use thiserror::Error;

/// Application-level errors (command line layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    LayoutError(#[from] timegrid_layout::error::LayoutError),

    #[error("Failed to read events from {}: {source}", path.display())]
    ReadEvents {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid events file: {0}")]
    InvalidEvents(#[from] serde_json::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

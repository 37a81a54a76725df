use thiserror::Error;

/// dropfeed error types
#[derive(Error, Debug)]
pub enum DropfeedError {
    /// Feed could not be retrieved (unreachable, non-success status, unreadable file)
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Feed as a whole is unusable (e.g. missing header columns)
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer failure
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for dropfeed
pub type Result<T> = std::result::Result<T, DropfeedError>;

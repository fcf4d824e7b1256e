//! Error types for stock_sync

use thiserror::Error;

/// Unified error type for a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    /// Request did not complete before the transport gave up
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    /// Could not connect to the remote host
    #[error("Connection error: {0}")]
    Connection(#[source] reqwest::Error),
    /// Any other HTTP transport failure
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),
    /// Remote answered with a non-success status code
    #[error("HTTP error {status} from {url}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },
    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Feed download is not a readable ZIP archive
    #[error("Feed archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// Spreadsheet inside the archive could not be read
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Feed archive has no entry named {0:?}")]
    MissingFeedFile(String),
    /// Sheet ends before the configured header row
    #[error("Feed sheet has no header at row {0}")]
    MissingHeader(u32),
    #[error("Feed header has no column {0:?}")]
    MissingColumn(String),
    #[error("Invalid quantity {0:?}")]
    InvalidQuantity(String),
    #[error("Invalid price {0:?} for offer {1}")]
    InvalidPrice(String, String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Short tag used when the run is aborted and the error is reported
    pub fn tag(&self) -> &'static str {
        match self {
            SyncError::Timeout(_) => "Request timed out",
            SyncError::Connection(_) => "Connection error",
            _ => "Sync failed",
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Timeout(err)
        } else if err.is_connect() {
            SyncError::Connection(err)
        } else {
            SyncError::Network(err)
        }
    }
}

/// Result alias for stock_sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

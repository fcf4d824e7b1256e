//! Shared HTTP response handling

use log::error;

use crate::error::{Result, SyncError};

pub const USER_AGENT: &str = "stock_sync/1.0";

/// Pass successful responses through; turn anything else into an HTTP status error
pub async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    error!("Request to {url} failed with status {status}: {body}");
    Err(SyncError::HttpStatus { status, url, body })
}

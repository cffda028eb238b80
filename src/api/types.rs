use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur talking to the video API.
///
/// Everything except `InvalidUrl` is treated as transient by callers: the
/// feed keeps whatever it has and the next visibility crossing retries.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the HTTP client timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body was not valid JSON for the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Endpoint path could not be joined onto the base URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Fold reqwest's timeout flavor into the dedicated variant.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }
}

// ============================================================================
// Wire Data
// ============================================================================

/// A single content item as returned by the video API.
///
/// String fields use `Arc<str>` for cheap cloning into background tasks and
/// the author cache. `created_at` is a millisecond UNIX timestamp; it is the
/// pagination cursor value for both sort orders.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Video {
    pub id: Arc<str>,
    pub author_id: Arc<str>,
    pub title: Arc<str>,
    pub thumbnail_url: Option<Arc<str>>,
    pub views: u64,
    pub created_at: i64,
}

/// Envelope for the paged `/videos` endpoint.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct PageResponse {
    pub videos: Vec<Video>,
}

/// Resolved author data from the `/users/{id}` endpoint.
///
/// `photo_url` is carried for parity with the API but the list view only
/// renders `username`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AuthorProfile {
    pub username: Arc<str>,
    #[allow(dead_code)]
    pub photo_url: Option<Arc<str>>,
}

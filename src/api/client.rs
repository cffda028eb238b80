//! HTTP adapter for the video API.
//!
//! Implements the [`PageFetcher`] contract over `GET /videos` and resolves
//! author profiles from `GET /users/{id}`. The client is cheap to clone into
//! background tasks (reqwest pools internally, the base URL and token are
//! shared handles).

use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::feed::{SortOrder, Timestamp};

use super::types::{ApiError, AuthorProfile, PageResponse, Video};
use super::PageFetcher;

/// Maximum response body size accepted from the API (1 MB is generous for a
/// page of metadata; anything larger is a misbehaving backend).
const MAX_RESPONSE_SIZE: usize = 1024 * 1024;

#[derive(Clone)]
pub struct VideoApi {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

/// Token is masked; only host and path of the base URL are interesting.
impl std::fmt::Debug for VideoApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoApi")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl VideoApi {
    pub fn new(client: reqwest::Client, base_url: Url, token: Option<SecretString>) -> Self {
        Self {
            client,
            base_url,
            token,
        }
    }

    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            );
        }
        request
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self
            .request(url)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited(response, MAX_RESPONSE_SIZE).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Resolve an author id to its profile. Failures are transient; callers
    /// fall back to the "User" placeholder.
    pub async fn fetch_author(&self, author_id: &str) -> Result<AuthorProfile, ApiError> {
        let url = self.base_url.join(&format!("users/{}", author_id))?;
        tracing::debug!(author_id, "Fetching author profile");
        self.get_json(url).await
    }
}

impl PageFetcher for VideoApi {
    async fn fetch_page(
        &self,
        order: SortOrder,
        cursor: Option<Timestamp>,
        limit: u32,
    ) -> Result<Vec<Video>, ApiError> {
        let mut url = self.base_url.join("videos")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("order", order.query_param());
            if let Some(after) = cursor {
                query.append_pair("after", &after.to_string());
            }
            query.append_pair("limit", &limit.to_string());
        }

        tracing::debug!(?order, ?cursor, limit, "Fetching page");
        let page: PageResponse = self.get_json(url).await?;

        if page.videos.len() as u32 > limit {
            tracing::warn!(
                requested = limit,
                received = page.videos.len(),
                "Backend returned more items than requested"
            );
        }
        Ok(page.videos)
    }
}

/// Read the body with a hard size cap, checking Content-Length first.
async fn read_limited(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ApiError::from_reqwest)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

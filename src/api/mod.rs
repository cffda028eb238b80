//! Video API collaborators: the paged-query contract and its HTTP adapter.

mod authors;
mod client;
mod types;

pub use authors::{AuthorCache, UNRESOLVED_AUTHOR};
pub use client::VideoApi;
pub use types::{ApiError, AuthorProfile, Video};

use std::future::Future;

use crate::feed::{SortOrder, Timestamp};

/// The paged-query capability the feed core is written against.
///
/// Implementations must return items strictly after `cursor` in `order`'s
/// sort direction, at most `limit` of them, and an empty vector (not an
/// error) when no further items exist. Callers treat an empty result as
/// exhaustion and an error as transient. Implementations are stateless and
/// reentrant; the at-most-one-in-flight-per-order discipline is enforced by
/// the caller, not here.
pub trait PageFetcher {
    fn fetch_page(
        &self,
        order: SortOrder,
        cursor: Option<Timestamp>,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Video>, ApiError>> + Send;
}

//! In-memory cache of resolved author profiles.
//!
//! Every video carries only an `author_id`; the display name comes from a
//! separate `/users/{id}` lookup. Profiles are immutable for the session, so
//! an LRU keyed by author id avoids re-fetching the same author for every
//! video they uploaded. Until a profile arrives the UI shows "User".

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use super::types::AuthorProfile;

/// Display name shown while a profile is unresolved or failed to load.
pub const UNRESOLVED_AUTHOR: &str = "User";

pub struct AuthorCache {
    cache: LruCache<Arc<str>, AuthorProfile>,
}

impl AuthorCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, author_id: &str) -> Option<&AuthorProfile> {
        self.cache.get(author_id)
    }

    pub fn contains(&self, author_id: &str) -> bool {
        self.cache.contains(author_id)
    }

    pub fn insert(&mut self, author_id: Arc<str>, profile: AuthorProfile) {
        self.cache.put(author_id, profile);
    }

    /// Display name for an author, falling back to the placeholder.
    /// Peeks without touching LRU order so render passes don't reorder.
    pub fn display_name(&self, author_id: &str) -> &str {
        self.cache
            .peek(author_id)
            .map(|p| &*p.username)
            .unwrap_or(UNRESOLVED_AUTHOR)
    }
}

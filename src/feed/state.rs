//! The dual-order pagination cache.
//!
//! `FeedState` owns one `OrderedFeed` per sort order plus the active
//! selector. The displayed sequence is always the active feed's `items`
//! slice — never an independent copy that could drift. Both caches stay warm
//! for the whole session; switching order never clears the opposite side.

use std::collections::HashSet;
use std::sync::Arc;

use crate::api::Video;

/// Millisecond UNIX timestamp used as the pagination cursor.
pub type Timestamp = i64;

// ============================================================================
// Sort Order
// ============================================================================

/// One of the two supported sort directions over `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Newest first (descending `created_at`). The default order.
    Newest,
    /// Oldest first (ascending `created_at`).
    Oldest,
}

impl SortOrder {
    /// Value of the `order` query parameter on the `/videos` endpoint.
    pub fn query_param(self) -> &'static str {
        match self {
            SortOrder::Newest => "desc",
            SortOrder::Oldest => "asc",
        }
    }

    /// Tab label in the filter bar.
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "New",
            SortOrder::Oldest => "Old",
        }
    }

    pub fn opposite(self) -> SortOrder {
        match self {
            SortOrder::Newest => SortOrder::Oldest,
            SortOrder::Oldest => SortOrder::Newest,
        }
    }
}

// ============================================================================
// Per-Order Feed
// ============================================================================

/// One order's cached result list.
///
/// Invariants:
/// - `items` contains no duplicate ids (`seen` is the authoritative set)
/// - `exhausted` is monotonic false→true and never resets
/// - the cursor (last item's `created_at`) only advances in the feed's sort
///   direction across successive appends
#[derive(Debug, Default)]
pub struct OrderedFeed {
    items: Vec<Video>,
    seen: HashSet<Arc<str>>,
    exhausted: bool,
}

impl OrderedFeed {
    fn with_items(items: Vec<Video>) -> Self {
        let mut feed = OrderedFeed::default();
        feed.extend_dedup(items);
        feed
    }

    pub fn items(&self) -> &[Video] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Creation timestamp of the last element, or `None` when empty
    /// (the "from start" cursor).
    pub fn cursor(&self) -> Option<Timestamp> {
        self.items.last().map(|v| v.created_at)
    }

    /// Append items in fetch order, dropping ids already present.
    /// Returns the number of items actually appended.
    fn extend_dedup(&mut self, items: Vec<Video>) -> usize {
        let mut appended = 0;
        for video in items {
            if self.seen.contains(&*video.id) {
                tracing::debug!(id = %video.id, "Dropping duplicate item from page");
                continue;
            }
            self.seen.insert(Arc::clone(&video.id));
            self.items.push(video);
            appended += 1;
        }
        appended
    }
}

// ============================================================================
// Feed State
// ============================================================================

/// The dual-order cache plus the active order selector.
///
/// Created once per browsing session, seeded with an initial page for
/// [`SortOrder::Newest`]; the `Oldest` feed starts empty and is populated
/// lazily by the first switch (see `FilterController`).
#[derive(Debug)]
pub struct FeedState {
    newest: OrderedFeed,
    oldest: OrderedFeed,
    active: SortOrder,
}

impl FeedState {
    /// Seed the session with the initial `Newest` page.
    ///
    /// An empty seed means no data exists at all, not merely an empty page,
    /// so BOTH orders are marked exhausted up front.
    pub fn new(seed: Vec<Video>) -> Self {
        let empty_seed = seed.is_empty();
        let mut state = Self {
            newest: OrderedFeed::with_items(seed),
            oldest: OrderedFeed::default(),
            active: SortOrder::Newest,
        };
        if empty_seed {
            state.newest.exhausted = true;
            state.oldest.exhausted = true;
        }
        state
    }

    pub fn active_order(&self) -> SortOrder {
        self.active
    }

    /// The currently displayed sequence. By construction this is the active
    /// feed's items, so an order switch updates it atomically.
    pub fn displayed(&self) -> &[Video] {
        self.feed(self.active).items()
    }

    pub fn feed(&self, order: SortOrder) -> &OrderedFeed {
        match order {
            SortOrder::Newest => &self.newest,
            SortOrder::Oldest => &self.oldest,
        }
    }

    fn feed_mut(&mut self, order: SortOrder) -> &mut OrderedFeed {
        match order {
            SortOrder::Newest => &mut self.newest,
            SortOrder::Oldest => &mut self.oldest,
        }
    }

    /// Cursor for the next fetch on `order`: the last cached item's
    /// timestamp, or `None` for "from start".
    pub fn cursor_for(&self, order: SortOrder) -> Option<Timestamp> {
        self.feed(order).cursor()
    }

    pub fn is_exhausted(&self, order: SortOrder) -> bool {
        self.feed(order).is_exhausted()
    }

    /// Merge a fetched page into `order`'s cache, preserving fetch order and
    /// dropping duplicate ids. An empty page marks the order exhausted.
    ///
    /// Appending to an already-exhausted feed is a logic error: asserted in
    /// debug builds, logged and ignored otherwise. Returns the number of
    /// items actually appended.
    pub fn append_page(&mut self, order: SortOrder, items: Vec<Video>) -> usize {
        let feed = self.feed_mut(order);
        if feed.exhausted {
            tracing::error!(?order, count = items.len(), "append_page after exhaustion");
            debug_assert!(false, "append_page called on exhausted {:?} feed", order);
            return 0;
        }

        if items.is_empty() {
            feed.exhausted = true;
            tracing::debug!(?order, "Empty page received, order exhausted");
            return 0;
        }

        let prev_cursor = feed.cursor();
        let appended = feed.extend_dedup(items);

        // Cursor must only advance in the feed's sort direction. Ties on
        // created_at are tolerated (broken by id on the backend).
        if let (Some(prev), Some(new)) = (prev_cursor, feed.cursor()) {
            let ok = match order {
                SortOrder::Newest => new <= prev,
                SortOrder::Oldest => new >= prev,
            };
            if !ok {
                tracing::error!(?order, prev, new, "Cursor moved against sort direction");
            }
            debug_assert!(ok, "cursor regressed for {:?}: {} -> {}", order, prev, new);
        }

        tracing::debug!(?order, appended, total = feed.len(), "Merged page into cache");
        appended
    }

    /// Mark `order` exhausted without appending. Used by the short-page rule:
    /// a successful page with fewer items than requested means the backend
    /// has nothing further. Monotonic, never resets.
    pub fn mark_exhausted(&mut self, order: SortOrder) {
        let feed = self.feed_mut(order);
        if !feed.exhausted {
            feed.exhausted = true;
            tracing::debug!(?order, "Order marked exhausted");
        }
    }

    /// Switch the active selector. The displayed sequence changes atomically;
    /// neither cache is touched.
    pub fn set_active(&mut self, order: SortOrder) {
        self.active = order;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testutil::{desc_page, video};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_populates_newest_only() {
        let state = FeedState::new(desc_page(0..3, 3000));
        assert_eq!(state.displayed().len(), 3);
        assert_eq!(state.active_order(), SortOrder::Newest);
        assert_eq!(state.cursor_for(SortOrder::Newest), Some(2998));
        assert_eq!(state.cursor_for(SortOrder::Oldest), None);
        assert!(!state.is_exhausted(SortOrder::Newest));
        assert!(!state.is_exhausted(SortOrder::Oldest));
    }

    #[test]
    fn test_empty_seed_exhausts_both_orders() {
        let state = FeedState::new(Vec::new());
        assert!(state.displayed().is_empty());
        assert!(state.is_exhausted(SortOrder::Newest));
        assert!(state.is_exhausted(SortOrder::Oldest));
    }

    #[test]
    fn test_append_advances_cursor() {
        let mut state = FeedState::new(desc_page(0..2, 2000));
        let appended = state.append_page(SortOrder::Newest, desc_page(2..5, 1500));
        assert_eq!(appended, 3);
        assert_eq!(state.displayed().len(), 5);
        assert_eq!(state.cursor_for(SortOrder::Newest), Some(1498));
    }

    #[test]
    fn test_append_deduplicates_by_id() {
        let mut state = FeedState::new(vec![video("a", 300), video("b", 200)]);
        // Page overlaps the cached tail ("b") as a backend might on re-fetch.
        let appended =
            state.append_page(SortOrder::Newest, vec![video("b", 200), video("c", 100)]);
        assert_eq!(appended, 1);
        let ids: Vec<&str> = state.displayed().iter().map(|v| &*v.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_page_marks_exhausted() {
        let mut state = FeedState::new(vec![video("a", 100)]);
        state.append_page(SortOrder::Newest, Vec::new());
        assert!(state.is_exhausted(SortOrder::Newest));
        // The other order is untouched.
        assert!(!state.is_exhausted(SortOrder::Oldest));
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn test_append_after_exhaustion_is_logic_error() {
        let mut state = FeedState::new(vec![video("a", 100)]);
        state.append_page(SortOrder::Newest, Vec::new());
        state.append_page(SortOrder::Newest, vec![video("b", 50)]);
    }

    #[test]
    fn test_duplicates_only_page_does_not_exhaust() {
        let mut state = FeedState::new(vec![video("a", 100)]);
        let appended = state.append_page(SortOrder::Newest, vec![video("a", 100)]);
        assert_eq!(appended, 0);
        // A full page came back from the backend, just nothing new survived.
        assert!(!state.is_exhausted(SortOrder::Newest));
    }

    #[test]
    fn test_switch_is_idempotent_and_atomic() {
        let mut state = FeedState::new(desc_page(0..4, 4000));
        state.append_page(SortOrder::Oldest, vec![video("old-1", 10), video("old-2", 20)]);

        let newest_before: Vec<Arc<str>> =
            state.displayed().iter().map(|v| Arc::clone(&v.id)).collect();

        state.set_active(SortOrder::Oldest);
        assert_eq!(state.displayed().len(), 2);
        assert_eq!(&*state.displayed()[0].id, "old-1");

        // Switching back shows exactly what was there before leaving.
        state.set_active(SortOrder::Newest);
        let newest_after: Vec<Arc<str>> =
            state.displayed().iter().map(|v| Arc::clone(&v.id)).collect();
        assert_eq!(newest_before, newest_after);
    }

    #[test]
    fn test_switch_never_shrinks_opposite_cache() {
        let mut state = FeedState::new(desc_page(0..4, 4000));
        state.append_page(SortOrder::Oldest, vec![video("old-1", 10)]);
        state.set_active(SortOrder::Oldest);
        assert_eq!(state.feed(SortOrder::Newest).len(), 4);
        state.set_active(SortOrder::Newest);
        assert_eq!(state.feed(SortOrder::Oldest).len(), 1);
    }

    #[test]
    fn test_mark_exhausted_is_monotonic() {
        let mut state = FeedState::new(vec![video("a", 100)]);
        state.mark_exhausted(SortOrder::Newest);
        state.mark_exhausted(SortOrder::Newest);
        assert!(state.is_exhausted(SortOrder::Newest));
    }
}

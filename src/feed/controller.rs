//! Order-switch and load-more orchestration.
//!
//! `FilterController` sits between the visibility signal, the `FeedState`
//! cache, and the PageFetcher. It never performs I/O itself: it mints
//! [`PageRequest`]s for the UI layer to run on background tasks and merges
//! the completions back into the cache, so every state mutation stays inside
//! the event loop.

use std::sync::Arc;

use crate::api::{ApiError, Video};

use super::state::{FeedState, SortOrder, Timestamp};
use super::trigger::VisibilityTrigger;

// ============================================================================
// Requests and Outcomes
// ============================================================================

/// A fetch the UI layer should run against the PageFetcher. Carried inside
/// the completion event so the controller knows the requested limit when the
/// result comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub order: SortOrder,
    pub cursor: Option<Timestamp>,
    pub limit: u32,
}

/// Outcome of an order-switch request.
#[derive(Debug, PartialEq, Eq)]
pub enum SwitchAction {
    /// Target is already displayed (or a backfill is still pending); nothing
    /// to do.
    AlreadyActive,
    /// The cached feed was activated with no fetch.
    Activated,
    /// First visit to an empty order: run this bulk fetch, then the
    /// completion activates the order.
    Backfill(PageRequest),
}

/// Result of merging a load-more completion.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded { appended: usize, exhausted: bool },
    Failed(ApiError),
}

/// Result of merging a backfill completion.
#[derive(Debug)]
pub enum BackfillOutcome {
    Switched { appended: usize },
    Failed(ApiError),
}

// ============================================================================
// Controller
// ============================================================================

pub struct FilterController {
    /// Steady-state incremental page size.
    load_limit: u32,
    /// One-time bulk backfill size for the first visit to an order.
    initial_limit: u32,
    newest_trigger: VisibilityTrigger,
    oldest_trigger: VisibilityTrigger,
    /// Order whose activation is waiting on a backfill completion.
    pending_switch: Option<SortOrder>,
}

impl FilterController {
    pub fn new(load_limit: u32, initial_limit: u32) -> Self {
        Self {
            load_limit,
            initial_limit,
            newest_trigger: VisibilityTrigger::default(),
            oldest_trigger: VisibilityTrigger::default(),
            pending_switch: None,
        }
    }

    fn trigger_mut(&mut self, order: SortOrder) -> &mut VisibilityTrigger {
        match order {
            SortOrder::Newest => &mut self.newest_trigger,
            SortOrder::Oldest => &mut self.oldest_trigger,
        }
    }

    fn trigger(&self, order: SortOrder) -> &VisibilityTrigger {
        match order {
            SortOrder::Newest => &self.newest_trigger,
            SortOrder::Oldest => &self.oldest_trigger,
        }
    }

    /// True while a fetch targeting `order` is outstanding (load-more or
    /// backfill). Used by the UI for the loading footer.
    pub fn is_loading(&self, order: SortOrder) -> bool {
        self.trigger(order).is_in_flight() || self.pending_switch == Some(order)
    }

    /// Attach the active order's trigger to the last displayed item.
    ///
    /// No observation is installed when the order is exhausted or empty, and
    /// an in-flight trigger is left alone (re-attachment happens when its
    /// completion arrives).
    pub fn observe_last(&mut self, feed: &FeedState) {
        let order = feed.active_order();
        let cache = feed.feed(order);
        let trigger = self.trigger_mut(order);
        if trigger.is_in_flight() {
            return;
        }
        if cache.is_exhausted() {
            trigger.detach();
            return;
        }
        match cache.items().last() {
            Some(last) => trigger.observe(Arc::clone(&last.id)),
            None => trigger.detach(),
        }
    }

    /// The last displayed item crossed into the visible window. Returns the
    /// load-more request to run, or `None` when the crossing should not fetch
    /// (not observed, already in flight, or exhausted).
    pub fn notify_last_visible(&mut self, feed: &FeedState) -> Option<PageRequest> {
        let order = feed.active_order();
        let last_id = Arc::clone(&feed.displayed().last()?.id);
        if !self.trigger_mut(order).notify_visible(&last_id) {
            return None;
        }
        let request = PageRequest {
            order,
            cursor: feed.cursor_for(order),
            limit: self.load_limit,
        };
        tracing::debug!(?order, cursor = ?request.cursor, limit = request.limit, "Load-more triggered");
        Some(request)
    }

    /// Request a switch to `target`.
    ///
    /// The first switch to an empty, non-exhausted order returns a bulk
    /// [`SwitchAction::Backfill`] of `initial_limit` items and delays
    /// activation until the completion, so the user never sees an empty list
    /// flash. Every later switch reuses the cached feed with no fetch.
    pub fn begin_switch(&mut self, feed: &mut FeedState, target: SortOrder) -> SwitchAction {
        if target == feed.active_order() {
            return SwitchAction::AlreadyActive;
        }
        if self.pending_switch.is_some() {
            tracing::debug!(?target, "Switch ignored, backfill already pending");
            return SwitchAction::AlreadyActive;
        }

        let cache = feed.feed(target);
        if cache.is_empty() && !cache.is_exhausted() {
            self.pending_switch = Some(target);
            let request = PageRequest {
                order: target,
                cursor: feed.cursor_for(target),
                limit: self.initial_limit,
            };
            tracing::info!(?target, limit = request.limit, "First switch, issuing backfill");
            return SwitchAction::Backfill(request);
        }

        self.activate(feed, target);
        SwitchAction::Activated
    }

    /// Merge a load-more completion for `request` into the cache.
    ///
    /// Success appends the page (short pages mark the order exhausted, so no
    /// trailing empty fetch is ever issued). Failure leaves the cache
    /// untouched and re-arms the trigger on the unchanged last element so the
    /// next visibility crossing retries. Completions targeting a now-inactive
    /// order are merged silently without touching the displayed sequence.
    pub fn complete_load(
        &mut self,
        feed: &mut FeedState,
        request: PageRequest,
        result: Result<Vec<Video>, ApiError>,
    ) -> LoadOutcome {
        self.trigger_mut(request.order).complete();

        let outcome = match result {
            Ok(items) => {
                let short = (items.len() as u32) < request.limit;
                let appended = feed.append_page(request.order, items);
                if short {
                    feed.mark_exhausted(request.order);
                }
                LoadOutcome::Loaded {
                    appended,
                    exhausted: feed.is_exhausted(request.order),
                }
            }
            Err(err) => {
                tracing::warn!(order = ?request.order, error = %err, "Load-more failed");
                LoadOutcome::Failed(err)
            }
        };

        if request.order == feed.active_order() {
            self.observe_last(feed);
        }
        outcome
    }

    /// Merge a backfill completion and, on success, activate the order it
    /// populated. On failure the current order stays active and the user can
    /// retry by switching again.
    pub fn complete_backfill(
        &mut self,
        feed: &mut FeedState,
        request: PageRequest,
        result: Result<Vec<Video>, ApiError>,
    ) -> BackfillOutcome {
        debug_assert_eq!(self.pending_switch, Some(request.order));
        self.pending_switch = None;

        match result {
            Ok(items) => {
                let short = (items.len() as u32) < request.limit;
                let appended = feed.append_page(request.order, items);
                if short {
                    feed.mark_exhausted(request.order);
                }
                self.activate(feed, request.order);
                BackfillOutcome::Switched { appended }
            }
            Err(err) => {
                tracing::warn!(order = ?request.order, error = %err, "Backfill failed");
                BackfillOutcome::Failed(err)
            }
        }
    }

    fn activate(&mut self, feed: &mut FeedState, target: SortOrder) {
        // Tear down the outgoing observation before installing the new one.
        self.trigger_mut(feed.active_order()).detach();
        feed.set_active(target);
        self.observe_last(feed);
    }
}

// ============================================================================
// Tests
// ============================================================================

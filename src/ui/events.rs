//! Application event handling.
//!
//! This module merges background fetch completions into the feed cache and
//! author cache, keeping selection and status in sync.

use crate::app::{App, AppEvent};
use crate::feed::{BackfillOutcome, LoadOutcome};

/// Status line shown when a load-more fetch fails.
const ERR_LOAD_MORE: &str = "Failed to load more videos";
/// Status line shown when a filter-switch backfill fails.
const ERR_BACKFILL: &str = "Failed to load videos";

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::PageLoaded { request, result } => {
            let was_active = request.order == app.feed.active_order();
            match app.controller.complete_load(&mut app.feed, request, result) {
                LoadOutcome::Loaded { appended, exhausted } => {
                    tracing::debug!(order = ?request.order, appended, exhausted, "Page merged");
                    if was_active {
                        app.clamp_selection();
                    }
                }
                LoadOutcome::Failed(_) => {
                    // Cache untouched; the trigger re-armed on the same last
                    // element so scrolling retries. Inactive-order failures
                    // stay silent.
                    if was_active {
                        app.set_status(ERR_LOAD_MORE);
                    }
                }
            }
        }
        AppEvent::BackfillLoaded { request, result } => {
            match app
                .controller
                .complete_backfill(&mut app.feed, request, result)
            {
                BackfillOutcome::Switched { appended } => {
                    tracing::info!(order = ?request.order, appended, "Switched to backfilled order");
                    app.reset_selection();
                }
                BackfillOutcome::Failed(_) => {
                    app.set_status(ERR_BACKFILL);
                }
            }
        }
        AppEvent::AuthorLoaded { author_id, result } => {
            if app.author_loading.as_deref() == Some(&*author_id) {
                app.author_loading = None;
            }
            match result {
                Ok(profile) => {
                    tracing::debug!(author_id = %author_id, username = %profile.username, "Author resolved");
                    app.authors.insert(author_id, profile);
                }
                Err(e) => {
                    // The "User" placeholder stays; a later selection retries.
                    tracing::debug!(author_id = %author_id, error = %e, "Author lookup failed");
                }
            }
        }
    }
}

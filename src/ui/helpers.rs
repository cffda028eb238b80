//! Background task spawning for the event loop.
//!
//! Every fetch runs on its own tokio task and reports back through the
//! [`AppEvent`] channel; nothing here touches `App` state directly.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{PageFetcher, VideoApi};
use crate::app::{App, AppEvent};
use crate::feed::PageRequest;

/// Fire a load-more fetch if the last displayed row just became visible.
///
/// `visibility_crossing` is edge-triggered, so calling this every frame spawns
/// at most one task per crossing even when a failed fetch left the trigger
/// re-armed on the same last element.
pub(super) fn maybe_load_more(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if !app.visibility_crossing() {
        return;
    }
    if let Some(request) = app.controller.notify_last_visible(&app.feed) {
        spawn_page_load(app.api.clone(), request, event_tx.clone());
    }
}

/// Run a load-more fetch on a background task.
pub(super) fn spawn_page_load(
    api: VideoApi,
    request: PageRequest,
    event_tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let result = api
            .fetch_page(request.order, request.cursor, request.limit)
            .await;
        let event = AppEvent::PageLoaded { request, result };
        if let Err(e) = event_tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send page result (receiver dropped)");
        }
    });
}

/// Run a first-switch backfill fetch on a background task.
pub(super) fn spawn_backfill_load(
    api: VideoApi,
    request: PageRequest,
    event_tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let result = api
            .fetch_page(request.order, request.cursor, request.limit)
            .await;
        let event = AppEvent::BackfillLoaded { request, result };
        if let Err(e) = event_tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send backfill result (receiver dropped)");
        }
    });
}

/// Resolve the selected video's author if it is not cached yet.
pub(super) fn maybe_load_author(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(author_id) = app.next_author_to_load() else {
        return;
    };
    app.author_loading = Some(Arc::clone(&author_id));

    let api = app.api.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = api.fetch_author(&author_id).await;
        let event = AppEvent::AuthorLoaded { author_id, result };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send author result (receiver dropped)");
        }
    });
}

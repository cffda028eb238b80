//! Central application state for the browsing session.
//!
//! `App` owns the dual-order feed cache, the load-more controller, the author
//! cache, and the list selection. All mutation happens on the event loop task;
//! background fetches communicate exclusively through [`AppEvent`].

use std::borrow::Cow;
use std::sync::Arc;

use tokio::time::Instant;

use crate::api::{ApiError, AuthorCache, AuthorProfile, Video, VideoApi};
use crate::config::Config;
use crate::feed::{FeedState, FilterController, PageRequest};

/// Status messages auto-expire after this many seconds.
const STATUS_EXPIRY_SECS: u64 = 3;

// ============================================================================
// Events
// ============================================================================

/// Completion events sent from background tasks to the event loop.
///
/// Page events carry the originating [`PageRequest`] so the controller knows
/// the requested limit (and target order) when it merges the result.
#[derive(Debug)]
pub enum AppEvent {
    /// A load-more fetch finished.
    PageLoaded {
        request: PageRequest,
        result: Result<Vec<Video>, ApiError>,
    },
    /// A first-switch backfill fetch finished.
    BackfillLoaded {
        request: PageRequest,
        result: Result<Vec<Video>, ApiError>,
    },
    /// An author profile lookup finished.
    AuthorLoaded {
        author_id: Arc<str>,
        result: Result<AuthorProfile, ApiError>,
    },
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub api: VideoApi,
    pub feed: FeedState,
    pub controller: FilterController,
    pub authors: AuthorCache,

    /// Base URL of the public site, for "open in browser".
    pub site_url: String,

    /// Index into `feed.displayed()` of the highlighted row.
    pub selected: usize,
    /// First displayed row (list scroll position).
    pub list_offset: usize,
    /// Rows the list area showed on the last render. Zero before first draw.
    pub list_visible_rows: usize,

    /// Author id with a lookup in flight, to avoid duplicate fetches.
    pub author_loading: Option<Arc<str>>,

    /// Whether the last item was visible on the previous frame. Used to turn
    /// the per-frame visibility level into a crossing signal.
    last_item_was_visible: bool,

    /// Status message with expiry. Cow avoids allocation for static literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    pub needs_redraw: bool,
}

impl App {
    pub fn new(api: VideoApi, config: &Config, seed: Vec<Video>) -> Self {
        let feed = FeedState::new(seed);
        let mut controller = FilterController::new(config.load_limit, config.initial_limit);
        controller.observe_last(&feed);

        Self {
            api,
            feed,
            controller,
            authors: AuthorCache::new(config.author_cache_size),
            site_url: config.site_url.trim_end_matches('/').to_string(),
            selected: 0,
            list_offset: 0,
            list_visible_rows: 0,
            author_loading: None,
            last_item_was_visible: false,
            status_message: None,
            needs_redraw: true,
        }
    }

    // ------------------------------------------------------------------
    // Selection and scrolling
    // ------------------------------------------------------------------

    /// The highlighted video, if the list is non-empty.
    pub fn selected_video(&self) -> Option<&Video> {
        self.feed.displayed().get(self.selected)
    }

    pub fn nav_down(&mut self) {
        let len = self.feed.displayed().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
            self.ensure_selected_visible();
        }
    }

    pub fn nav_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_selected_visible();
        }
    }

    pub fn nav_top(&mut self) {
        self.selected = 0;
        self.ensure_selected_visible();
    }

    pub fn nav_bottom(&mut self) {
        let len = self.feed.displayed().len();
        self.selected = len.saturating_sub(1);
        self.ensure_selected_visible();
    }

    /// Clamp selection after the displayed sequence changed (order switch or
    /// merge into the active order). The visibility edge resets with it: the
    /// new last element has not been seen yet.
    pub fn clamp_selection(&mut self) {
        let len = self.feed.displayed().len();
        if len == 0 {
            self.selected = 0;
            self.list_offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        self.last_item_was_visible = false;
        self.ensure_selected_visible();
    }

    /// Reset selection to the top, for order switches.
    pub fn reset_selection(&mut self) {
        self.selected = 0;
        self.list_offset = 0;
        self.last_item_was_visible = false;
    }

    /// Scroll the list window so the selected row stays visible.
    fn ensure_selected_visible(&mut self) {
        if self.list_visible_rows == 0 {
            return;
        }
        if self.selected < self.list_offset {
            self.list_offset = self.selected;
        } else if self.selected >= self.list_offset + self.list_visible_rows {
            self.list_offset = self.selected + 1 - self.list_visible_rows;
        }
    }

    /// Whether the last displayed item currently falls inside the visible
    /// window.
    pub fn last_item_visible(&self) -> bool {
        let len = self.feed.displayed().len();
        if len == 0 || self.list_visible_rows == 0 {
            return false;
        }
        len - 1 < self.list_offset + self.list_visible_rows
    }

    /// Edge-triggered visibility: true exactly when the last item became
    /// visible this frame after not being visible on the previous one. This
    /// is the crossing signal fed to the controller, so a failed fetch whose
    /// trigger re-armed on the same element retries once per fresh crossing
    /// instead of once per frame.
    ///
    /// The edge resets when the displayed sequence changes (order switch or
    /// page merge), so a newly attached last element that is already inside
    /// the window still counts as a crossing.
    pub fn visibility_crossing(&mut self) -> bool {
        let visible = self.last_item_visible();
        let crossing = visible && !self.last_item_was_visible;
        self.last_item_was_visible = visible;
        crossing
    }

    // ------------------------------------------------------------------
    // Author resolution
    // ------------------------------------------------------------------

    /// Author id the UI needs next, if any: the selected video's author when
    /// it is neither cached nor already being fetched.
    pub fn next_author_to_load(&self) -> Option<Arc<str>> {
        let video = self.selected_video()?;
        if self.authors.contains(&video.author_id) {
            return None;
        }
        if self.author_loading.as_deref() == Some(&*video.author_id) {
            return None;
        }
        Some(Arc::clone(&video.author_id))
    }

    // ------------------------------------------------------------------
    // Status messages
    // ------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_EXPIRY_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// URL of the selected video's watch page on the public site.
    pub fn selected_watch_url(&self) -> Option<String> {
        let video = self.selected_video()?;
        Some(format!("{}/watch/{}", self.site_url, video.id))
    }
}

// ============================================================================
// Tests
// ============================================================================

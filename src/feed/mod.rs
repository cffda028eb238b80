//! The dual-order pagination core.
//!
//! This module contains the client-side orchestration logic that sits between
//! the paged video API and the scroll-visibility signal:
//!
//! - [`state`] - The two per-order caches and the active-order selector
//! - [`trigger`] - The load-more visibility state machine
//! - [`controller`] - Order switching, backfill, and page merging

pub mod controller;
pub mod state;
pub mod trigger;

pub use controller::{BackfillOutcome, FilterController, LoadOutcome, PageRequest, SwitchAction};
pub use state::{FeedState, OrderedFeed, SortOrder, Timestamp};
pub use trigger::{TriggerState, VisibilityTrigger};

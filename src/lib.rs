//! reel — a terminal video feed browser.
//!
//! The core is a dual-order pagination cache: one incrementally fetched list
//! per sort order, a visibility trigger that fires exactly once per crossing
//! of the last displayed item, and a filter controller that switches between
//! cached orders without refetching.

pub mod api;
pub mod app;
pub mod config;
pub mod feed;
pub mod ui;
pub mod util;

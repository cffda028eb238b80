//! Terminal User Interface module.
//!
//! This module provides the TUI for the video feed browser, including:
//! - Main event loop (`run`)
//! - Keyboard input handling
//! - Rendering for the filter bar, video list, and status bar
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering
//! - `helpers` - Background task spawning
//! - `status` - Status bar widget

mod events;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::run;

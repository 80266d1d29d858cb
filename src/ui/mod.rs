//! Terminal User Interface module.
//!
//! This module provides the TUI for the short-video feed, including:
//! - Main event loop (`run`)
//! - Input handling for the feed, keyword picker and help overlay
//! - Rendering for video cards, the side list and overlays
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - View rendering dispatch
//! - `feed` - Video cards and side list
//! - `keywords` - Keyword picker overlay
//! - `help` - Keybinding help overlay
//! - `status` - Status bar widget

// Submodules for UI components
mod feed;
mod help;
mod input;
mod keywords;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};

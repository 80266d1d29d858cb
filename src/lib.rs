//! reel: a terminal short-video feed with keyword filtering.
//!
//! The feed core lives in [`shorts`] and is independent of the terminal;
//! [`ui`] drives it from crossterm events, [`player`] simulates the media
//! elements and [`storage`] persists keyword preferences in SQLite.

pub mod app;
pub mod config;
pub mod keybindings;
pub mod player;
pub mod shorts;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;

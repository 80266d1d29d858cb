//! Small text helpers shared by the feed core and the terminal UI.
//!
//! - **Width-aware truncation** so Korean titles and keywords (two columns per
//!   syllable) never overflow a panel
//! - **Input sanitizing** for user-typed keywords
//! - **Number formatting** for view/like counters
//!
//! # Examples
//!
//! ```
//! use reel::util::{display_width, format_count, truncate_to_width};
//!
//! assert_eq!(display_width("강아지"), 6);
//! assert_eq!(truncate_to_width("마음의 위로", 7), "마음...");
//! assert_eq!(format_count(1234567), "1,234,567");
//! ```

mod text;

pub use text::{
    display_width, format_count, parse_duration_secs, sanitize_keyword, strip_control_chars,
    truncate_to_width,
};

/// Maximum length (in chars) accepted for a user-typed keyword.
pub const MAX_KEYWORD_LENGTH: usize = 32;

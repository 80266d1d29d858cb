//! The keyword-filtered short-video feed.
//!
//! # Module Structure
//!
//! - `item` - Feed items and the static catalog
//! - `keywords` - Built-in and custom keywords
//! - `selection` - Draft/committed keyword selection
//! - `filter` - Visible feed derivation
//! - `playback` - Active item, media window, scroll debounce
//! - `likes` - Session-local like marks
//! - `session` - [`ShortsFeed`], composing all of the above

mod filter;
mod item;
mod keywords;
mod likes;
mod playback;
mod selection;
mod session;

pub use filter::{keyword_histogram, VisibleFeed};
#[cfg(test)]
pub(crate) use item::clip;
pub use item::{builtin_catalog, load_catalog, parse_catalog, Catalog, CatalogError, FeedItem};
pub use keywords::{
    KeywordCatalog, KeywordError, KeywordRejected, KeywordSet, DEFAULT_KEYWORDS,
    MAX_CUSTOM_KEYWORDS,
};
pub use likes::LikeLedger;
pub use playback::{
    MediaPlayer, MediaWindow, PlaybackError, PlaybackState, PlaybackTracker, Preload,
    ScrollDebounce,
};
pub use selection::{SelectionError, SelectionStaging};
pub use session::{FeedSettings, ShortsFeed};

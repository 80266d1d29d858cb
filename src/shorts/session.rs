//! The short-video feed session.
//!
//! [`ShortsFeed`] owns the keyword catalog, selection staging, visible feed,
//! playback tracker and like ledger, and implements the effects that cross
//! them: applying or clearing the selection rebuilds the feed and re-seats
//! playback at index 0, removing a custom keyword also edits the draft.
//!
//! The store and the player are passed per call rather than owned, the same
//! way preferences take `&Database`.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use super::filter::{keyword_histogram, VisibleFeed};
use super::item::{Catalog, FeedItem};
use super::keywords::{KeywordCatalog, KeywordError};
use super::likes::LikeLedger;
use super::playback::{MediaPlayer, MediaWindow, PlaybackState, PlaybackTracker, ScrollDebounce};
use super::selection::{SelectionError, SelectionStaging};
use crate::storage::{KeyValueStore, StoreError};

/// Tunables for a feed session.
#[derive(Debug, Clone, Copy)]
pub struct FeedSettings {
    pub window_radius: usize,
    pub scroll_debounce: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            window_radius: MediaWindow::DEFAULT_RADIUS,
            scroll_debounce: ScrollDebounce::DEFAULT_DELAY,
        }
    }
}

pub struct ShortsFeed {
    catalog: Catalog,
    keywords: KeywordCatalog,
    selection: SelectionStaging,
    visible: VisibleFeed,
    playback: PlaybackTracker,
    likes: LikeLedger,
    debounce: ScrollDebounce,
    /// Rows scrolled from the top of the first item.
    scroll_offset: u32,
    /// Rows one item occupies; 0 until the first layout.
    item_height: u32,
}

impl ShortsFeed {
    /// Load persisted keyword state and derive the initial feed.
    ///
    /// Playback is not started until [`ShortsFeed::start`].
    pub async fn load<S: KeyValueStore>(store: &S, catalog: Catalog, settings: FeedSettings) -> Self {
        let keywords = KeywordCatalog::load(store).await;
        let selection = SelectionStaging::load(store).await;
        let visible = VisibleFeed::derive(&catalog, selection.committed());
        tracing::info!(
            catalog = catalog.len(),
            visible = visible.len(),
            custom_keywords = keywords.custom_keywords().len(),
            "Feed session loaded"
        );
        Self {
            catalog,
            keywords,
            selection,
            visible,
            playback: PlaybackTracker::new(MediaWindow::new(settings.window_radius)),
            likes: LikeLedger::new(),
            debounce: ScrollDebounce::new(settings.scroll_debounce),
            scroll_offset: 0,
            item_height: 0,
        }
    }

    /// Activate the first visible item and attach its window.
    pub fn start<P: MediaPlayer>(&mut self, player: &mut P) {
        self.playback.reset(&self.visible, player);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn keywords(&self) -> &KeywordCatalog {
        &self.keywords
    }

    pub fn selection(&self) -> &SelectionStaging {
        &self.selection
    }

    pub fn visible(&self) -> &VisibleFeed {
        &self.visible
    }

    pub fn playback(&self) -> &PlaybackTracker {
        &self.playback
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn likes(&self) -> &LikeLedger {
        &self.likes
    }

    pub fn active_item(&self) -> Option<&FeedItem> {
        self.playback
            .active_index()
            .and_then(|i| self.visible.get(i))
    }

    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    pub fn is_scrolling(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Catalog items per keyword.
    pub fn keyword_counts(&self) -> HashMap<&str, usize> {
        keyword_histogram(&self.catalog)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn open_selection(&mut self) {
        self.selection.open();
    }

    pub fn toggle_keyword(&mut self, keyword: &str) -> Result<bool, SelectionError> {
        self.selection.toggle(keyword)
    }

    pub fn reset_selection(&mut self) -> Result<(), SelectionError> {
        self.selection.reset()
    }

    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
    }

    /// Commit the draft, rebuild the feed and restart at the first item.
    pub async fn apply_selection<S: KeyValueStore, P: MediaPlayer>(
        &mut self,
        store: &S,
        player: &mut P,
    ) -> Result<(), SelectionError> {
        self.selection.apply(store).await?;
        self.rebuild(player);
        Ok(())
    }

    /// Drop the filter entirely. Recovery action for an empty feed.
    pub async fn clear_filter<S: KeyValueStore, P: MediaPlayer>(
        &mut self,
        store: &S,
        player: &mut P,
    ) -> Result<(), SelectionError> {
        self.selection.clear(store).await?;
        self.rebuild(player);
        Ok(())
    }

    fn rebuild<P: MediaPlayer>(&mut self, player: &mut P) {
        self.visible = VisibleFeed::derive(&self.catalog, self.selection.committed());
        self.scroll_offset = 0;
        self.debounce.cancel();
        self.playback.reset(&self.visible, player);
        tracing::debug!(
            visible = self.visible.len(),
            selected = self.selection.committed().len(),
            "Visible feed rebuilt"
        );
    }

    // ========================================================================
    // Custom keywords
    // ========================================================================

    pub async fn add_custom_keyword<S: KeyValueStore>(
        &mut self,
        store: &S,
        raw: &str,
    ) -> Result<String, KeywordError> {
        self.keywords.add_custom(store, raw).await
    }

    /// Remove a custom keyword, also unchecking it in an open draft.
    ///
    /// The committed selection keeps the keyword until the next apply.
    pub async fn remove_custom_keyword<S: KeyValueStore>(
        &mut self,
        store: &S,
        keyword: &str,
    ) -> Result<bool, StoreError> {
        let removed = self.keywords.remove_custom(store, keyword).await?;
        if removed {
            self.selection.remove_from_draft(keyword);
        }
        Ok(removed)
    }

    // ========================================================================
    // Scrolling and playback
    // ========================================================================

    /// Update the per-item height after a layout change, keeping the active
    /// item in view.
    pub fn set_item_height(&mut self, height: u32) {
        if height == self.item_height {
            return;
        }
        self.item_height = height;
        self.snap_to_active();
    }

    fn max_offset(&self) -> u32 {
        let items = u32::try_from(self.visible.len()).unwrap_or(u32::MAX);
        items.saturating_sub(1).saturating_mul(self.item_height)
    }

    /// Scroll by `delta` rows, clamped to the feed. Restarts the debounce.
    pub fn scroll_by(&mut self, delta: i64, now: Instant) {
        let target = i64::from(self.scroll_offset).saturating_add(delta);
        let clamped = target.clamp(0, i64::from(self.max_offset()));
        self.scroll_to(u32::try_from(clamped).unwrap_or(0), now);
    }

    pub fn scroll_to(&mut self, offset: u32, now: Instant) {
        self.scroll_offset = offset.min(self.max_offset());
        self.debounce.touch(now);
    }

    /// Scroll by whole items (for next/previous navigation).
    pub fn scroll_items(&mut self, items: i64, now: Instant) {
        self.scroll_by(items.saturating_mul(i64::from(self.item_height)), now);
    }

    /// Evaluate a pending scroll once it has been quiet long enough.
    ///
    /// Returns the new active index on a transition. The offset snaps to the
    /// active item afterwards.
    pub fn tick<P: MediaPlayer>(&mut self, now: Instant, player: &mut P) -> Option<usize> {
        if !self.debounce.poll(now) {
            return None;
        }
        let moved = self
            .playback
            .settle(self.scroll_offset, self.item_height, &self.visible, player);
        self.snap_to_active();
        moved
    }

    fn snap_to_active(&mut self) {
        let index = self.playback.active_index().unwrap_or(0);
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.scroll_offset = index.saturating_mul(self.item_height);
    }

    pub fn toggle_play<P: MediaPlayer>(&mut self, player: &mut P) -> bool {
        self.playback.toggle_play(player)
    }

    // ========================================================================
    // Likes
    // ========================================================================

    pub fn toggle_like(&mut self, id: &str) -> bool {
        self.likes.toggle(id)
    }

    /// Toggle the like on the active item, if any.
    pub fn toggle_like_active(&mut self) -> Option<bool> {
        let id = self.active_item()?.id.clone();
        Some(self.likes.toggle(&id))
    }

    pub fn like_count(&self, item: &FeedItem) -> u64 {
        self.likes.display_count(item)
    }
}

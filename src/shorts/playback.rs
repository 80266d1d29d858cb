//! Active-item tracking and single-item playback.
//!
//! The tracker maps a settled scroll offset to an active index, keeps exactly
//! one item eligible to play, and attaches media only to items within
//! [`MediaWindow`] distance of the active one. Everything else is a
//! placeholder.

use std::collections::BTreeMap;
use std::ops::Range;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use super::filter::VisibleFeed;
use super::item::FeedItem;

// ============================================================================
// Media facility
// ============================================================================

/// How much of an attached item the player should fetch ahead of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preload {
    /// Active item: fetch enough to play immediately.
    Full,
    /// Neighbors: metadata (duration, poster) only.
    Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("Playback blocked by autoplay policy")]
    Blocked,

    #[error("Media for '{0}' is not attached")]
    NotAttached(String),
}

/// The environment's playback capability.
///
/// `start` reports rejection synchronously; the tracker treats a rejection as
/// "paused", never as a failure of its own.
pub trait MediaPlayer {
    /// Attach (or re-attach with a different preload) the item's media.
    fn attach(&mut self, item: &FeedItem, preload: Preload);

    /// Release the item's media resource.
    fn detach(&mut self, id: &str);

    fn start(&mut self, id: &str) -> Result<(), PlaybackError>;

    fn pause(&mut self, id: &str);

    fn set_muted(&mut self, id: &str, muted: bool);
}

// ============================================================================
// Resource window
// ============================================================================

/// Distance-keyed eviction rule: an item keeps a live media resource only
/// while `|index - active| <= radius`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaWindow {
    radius: usize,
}

impl MediaWindow {
    pub const DEFAULT_RADIUS: usize = 2;

    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn contains(&self, active: usize, index: usize) -> bool {
        active.abs_diff(index) <= self.radius
    }

    /// Indices that should be attached for a feed of `len` items.
    pub fn range(&self, active: usize, len: usize) -> Range<usize> {
        if len == 0 {
            return 0..0;
        }
        let start = active.saturating_sub(self.radius);
        let end = active.saturating_add(self.radius).saturating_add(1).min(len);
        start.min(end)..end
    }
}

impl Default for MediaWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

// ============================================================================
// Scroll debounce
// ============================================================================

/// Coalesces bursts of scroll events into one settle evaluation.
///
/// Every event restarts the quiet period; the caller reads its own latest
/// scroll offset when [`ScrollDebounce::poll`] fires, so the last write wins.
#[derive(Debug, Clone)]
pub struct ScrollDebounce {
    delay: Duration,
    last_event: Option<Instant>,
}

impl ScrollDebounce {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_event: None,
        }
    }

    /// Record a scroll event at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }

    /// True exactly once after the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(at) if now.saturating_duration_since(at) >= self.delay => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.last_event = None;
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// Observable tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// The visible feed is empty; nothing can play.
    Empty,
    Active { index: usize, playing: bool },
}

#[derive(Debug, Clone)]
struct ActiveItem {
    index: usize,
    id: String,
}

#[derive(Debug, Clone)]
pub struct PlaybackTracker {
    active: Option<ActiveItem>,
    /// User intent; survives feed changes and the empty state.
    playing: bool,
    window: MediaWindow,
    attached: BTreeMap<String, Preload>,
}

impl PlaybackTracker {
    pub fn new(window: MediaWindow) -> Self {
        Self {
            active: None,
            playing: true,
            window,
            attached: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        match &self.active {
            None => PlaybackState::Empty,
            Some(active) => PlaybackState::Active {
                index: active.index,
                playing: self.playing,
            },
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.index)
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some() && self.playing
    }

    pub fn window(&self) -> MediaWindow {
        self.window
    }

    /// Whether the item currently holds a media resource.
    pub fn is_attached(&self, id: &str) -> bool {
        self.attached.contains_key(id)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Re-seat the tracker on a (new) visible feed at index 0.
    ///
    /// Pauses whatever was active, then activates the first item, or enters
    /// [`PlaybackState::Empty`] and releases every resource.
    pub fn reset<P: MediaPlayer>(&mut self, feed: &VisibleFeed, player: &mut P) {
        self.pause_active(player);
        match feed.get(0) {
            Some(first) => {
                self.active = Some(ActiveItem {
                    index: 0,
                    id: first.id.clone(),
                });
                self.sync_window(feed, player);
                if self.playing {
                    self.start_active(player);
                }
            }
            None => {
                self.active = None;
                self.sync_window(feed, player);
                tracing::debug!("Visible feed is empty");
            }
        }
    }

    /// Evaluate a settled scroll position.
    ///
    /// `round(offset / item_height)` becomes the active index if it differs
    /// from the current one and is in range. Returns the new index on a
    /// transition. An item height of 0 never settles.
    pub fn settle<P: MediaPlayer>(
        &mut self,
        offset: u32,
        item_height: u32,
        feed: &VisibleFeed,
        player: &mut P,
    ) -> Option<usize> {
        if item_height == 0 {
            return None;
        }
        let current = self.active_index()?;
        let target = (f64::from(offset) / f64::from(item_height)).round() as usize;
        if target == current || target >= feed.len() {
            return None;
        }
        self.activate(target, feed, player);
        Some(target)
    }

    /// Flip play/pause on the active item. Returns whether it is now playing.
    ///
    /// Starting is user-initiated, so a rejected unmuted start gets one muted
    /// attempt before the tracker gives up and stays paused.
    pub fn toggle_play<P: MediaPlayer>(&mut self, player: &mut P) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        let id = active.id.clone();

        if self.playing {
            player.pause(&id);
            self.playing = false;
            return false;
        }

        player.set_muted(&id, false);
        if player.start(&id).is_ok() {
            self.playing = true;
            return true;
        }

        player.set_muted(&id, true);
        match player.start(&id) {
            Ok(()) => {
                tracing::debug!(id = %id, "Unmuted start rejected, playing muted");
                self.playing = true;
            }
            Err(e) => {
                tracing::info!(id = %id, error = %e, "Playback rejected");
                self.playing = false;
            }
        }
        self.playing
    }

    fn activate<P: MediaPlayer>(&mut self, index: usize, feed: &VisibleFeed, player: &mut P) {
        let Some(item) = feed.get(index) else {
            return;
        };
        self.pause_active(player);
        tracing::debug!(index, id = %item.id, "Active item changed");
        self.active = Some(ActiveItem {
            index,
            id: item.id.clone(),
        });
        self.sync_window(feed, player);
        if self.playing {
            self.start_active(player);
        }
    }

    /// Pause and mute the active item if it still holds media.
    fn pause_active<P: MediaPlayer>(&mut self, player: &mut P) {
        if let Some(active) = &self.active {
            if self.attached.contains_key(&active.id) {
                player.pause(&active.id);
                player.set_muted(&active.id, true);
            }
        }
    }

    /// Automatic start of the active item. A rejection downgrades to paused
    /// and is not retried.
    fn start_active<P: MediaPlayer>(&mut self, player: &mut P) {
        let Some(active) = &self.active else {
            return;
        };
        player.set_muted(&active.id, false);
        if let Err(e) = player.start(&active.id) {
            tracing::info!(id = %active.id, error = %e, "Autoplay rejected, pausing");
            player.set_muted(&active.id, true);
            self.playing = false;
        }
    }

    /// Attach items inside the window, detach the rest.
    fn sync_window<P: MediaPlayer>(&mut self, feed: &VisibleFeed, player: &mut P) {
        let mut wanted: BTreeMap<String, (usize, Preload)> = BTreeMap::new();
        if let Some(active) = &self.active {
            for index in self.window.range(active.index, feed.len()) {
                if let Some(item) = feed.get(index) {
                    let preload = if index == active.index {
                        Preload::Full
                    } else {
                        Preload::Metadata
                    };
                    wanted.insert(item.id.clone(), (index, preload));
                }
            }
        }

        let evicted: Vec<String> = self
            .attached
            .keys()
            .filter(|id| !wanted.contains_key(*id))
            .cloned()
            .collect();
        for id in evicted {
            player.pause(&id);
            player.detach(&id);
            self.attached.remove(&id);
        }

        for (id, (index, preload)) in wanted {
            if self.attached.get(&id) == Some(&preload) {
                continue;
            }
            if let Some(item) = feed.get(index) {
                player.attach(item, preload);
                if preload == Preload::Metadata {
                    player.set_muted(&id, true);
                }
                self.attached.insert(id, preload);
            }
        }
    }
}

impl Default for PlaybackTracker {
    fn default() -> Self {
        Self::new(MediaWindow::default())
    }
}

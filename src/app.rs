use crate::config::Config;
use crate::keybindings::KeybindingRegistry;
use crate::player::SimulatedPlayer;
use crate::shorts::{KeywordError, KeywordRejected, SelectionError, ShortsFeed, MAX_CUSTOM_KEYWORDS};
use crate::storage::Database;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::MAX_KEYWORD_LENGTH;
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::time::Instant;

// ============================================================================
// Keyword Picker State
// ============================================================================

/// Cursor and text-entry state of the keyword picker.
///
/// Whether the picker is open is owned by the feed's selection staging; this
/// only tracks what the UI needs on top of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordPicker {
    /// Index into default keywords followed by custom ones.
    pub cursor: usize,
    /// Text being typed for a new custom keyword, while adding.
    pub input: Option<String>,
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub db: Database,
    pub feed: ShortsFeed,
    pub player: SimulatedPlayer,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    /// Rows scrolled per key press.
    pub scroll_step: u16,

    pub picker: KeywordPicker,

    // P-8: Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Time of the previous tick, for advancing playback positions.
    pub last_tick: Instant,

    pub show_help: bool,
    /// Scroll offset in the help screen for long keybinding lists.
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(db: Database, feed: ShortsFeed, player: SimulatedPlayer, config: &Config) -> Self {
        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, falling back to dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!(warning = %warning, "Invalid keybinding override");
        }

        Self {
            db,
            feed,
            player,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            scroll_step: config.scroll_step(),
            picker: KeywordPicker::default(),
            status_message: None,
            needs_redraw: true,
            last_tick: Instant::now(),
            show_help: false,
            help_scroll_offset: 0,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant (Dark → Light → Dark).
    ///
    /// Returns the name of the new theme for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ========================================================================
    // Feed
    // ========================================================================

    pub fn scroll(&mut self, rows: i64) {
        self.feed.scroll_by(rows, Instant::now());
    }

    pub fn step_items(&mut self, items: i64) {
        self.feed.scroll_items(items, Instant::now());
    }

    /// Play/pause the active item. Counts as a user gesture.
    pub fn toggle_play(&mut self) {
        if self.feed.active_item().is_none() {
            return;
        }
        self.player.grant_user_activation();
        let playing = self.feed.toggle_play(&mut self.player);
        let muted = self
            .feed
            .active_item()
            .and_then(|item| self.player.slot(&item.id))
            .is_some_and(|slot| slot.muted);
        match (playing, muted) {
            (true, true) => self.set_status("Playing (muted)"),
            (true, false) => self.set_status("Playing"),
            (false, _) => self.set_status("Paused"),
        }
    }

    pub fn toggle_like(&mut self) {
        if let Some(liked) = self.feed.toggle_like_active() {
            self.set_status(if liked { "Liked" } else { "Like removed" });
        }
    }

    /// Clear the keyword filter (recovery for an empty feed).
    pub async fn clear_filter(&mut self) {
        match self.feed.clear_filter(&self.db, &mut self.player).await {
            Ok(()) => self.set_status("Keyword filter cleared"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to clear keyword filter");
                self.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Periodic work: advance playback and settle pending scrolls.
    ///
    /// Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.player.advance(elapsed);

        let moved = self.feed.tick(now, &mut self.player).is_some();
        moved || self.feed.playback().is_playing() || self.feed.is_scrolling()
    }

    // ========================================================================
    // Keyword picker
    // ========================================================================

    pub fn picker_open(&self) -> bool {
        self.feed.selection().is_editing()
    }

    pub fn is_entering_keyword(&self) -> bool {
        self.picker.input.is_some()
    }

    fn picker_len(&self) -> usize {
        self.feed.keywords().all().count()
    }

    /// Keyword under the picker cursor.
    pub fn keyword_at_cursor(&self) -> Option<&str> {
        self.feed.keywords().all().nth(self.picker.cursor)
    }

    pub fn open_picker(&mut self) {
        self.feed.open_selection();
        self.picker = KeywordPicker::default();
    }

    pub fn picker_down(&mut self) {
        let len = self.picker_len();
        if len > 0 {
            self.picker.cursor = (self.picker.cursor + 1).min(len - 1);
        }
    }

    pub fn picker_up(&mut self) {
        self.picker.cursor = self.picker.cursor.saturating_sub(1);
    }

    pub fn toggle_keyword_at_cursor(&mut self) -> Result<(), SelectionError> {
        if let Some(keyword) = self.keyword_at_cursor().map(str::to_string) {
            self.feed.toggle_keyword(&keyword)?;
        }
        Ok(())
    }

    pub fn reset_picker(&mut self) -> Result<(), SelectionError> {
        self.feed.reset_selection()
    }

    pub fn cancel_picker(&mut self) {
        self.feed.cancel_selection();
        self.picker = KeywordPicker::default();
    }

    /// Commit the draft. On failure the picker stays open with the draft.
    pub async fn apply_picker(&mut self) {
        match self.feed.apply_selection(&self.db, &mut self.player).await {
            Ok(()) => {
                self.picker = KeywordPicker::default();
                let count = self.feed.visible().len();
                if count == 0 {
                    self.set_status("No videos match these keywords");
                } else {
                    self.set_status(format!("{} videos", count));
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to apply keyword selection");
                self.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Start typing a new custom keyword, unless the list is full.
    pub fn begin_keyword_entry(&mut self) {
        if self.feed.keywords().is_full() {
            self.set_status(format!(
                "Up to {} custom keywords; delete one first",
                MAX_CUSTOM_KEYWORDS
            ));
            return;
        }
        self.picker.input = Some(String::new());
    }

    pub fn keyword_entry_push(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        if let Some(input) = self.picker.input.as_mut() {
            if input.chars().count() < MAX_KEYWORD_LENGTH {
                input.push(c);
            }
        }
    }

    pub fn keyword_entry_pop(&mut self) {
        if let Some(input) = self.picker.input.as_mut() {
            input.pop();
        }
    }

    pub fn cancel_keyword_entry(&mut self) {
        self.picker.input = None;
    }

    /// Add the typed keyword. The entry stays open on rejection so the user
    /// can correct it.
    pub async fn submit_keyword_entry(&mut self) {
        let Some(raw) = self.picker.input.clone() else {
            return;
        };
        match self.feed.add_custom_keyword(&self.db, &raw).await {
            Ok(keyword) => {
                self.picker.input = None;
                if let Some(pos) = self.feed.keywords().all().position(|k| k == keyword) {
                    self.picker.cursor = pos;
                }
                self.set_status(format!("Added '{}'", keyword));
            }
            Err(KeywordError::Rejected(reason)) => {
                if matches!(reason, KeywordRejected::CapacityExceeded { .. }) {
                    self.picker.input = None;
                }
                self.set_status(reason.to_string());
            }
            Err(e @ KeywordError::Storage(_)) => {
                tracing::error!(error = %e, "Failed to add custom keyword");
                self.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Delete the custom keyword under the cursor. Built-in keywords are
    /// left alone.
    pub async fn delete_keyword_at_cursor(&mut self) {
        let Some(keyword) = self.keyword_at_cursor().map(str::to_string) else {
            return;
        };
        if !self.feed.keywords().is_custom(&keyword) {
            self.set_status("Built-in keywords cannot be deleted");
            return;
        }
        match self.feed.remove_custom_keyword(&self.db, &keyword).await {
            Ok(_) => {
                let len = self.picker_len();
                self.picker.cursor = self.picker.cursor.min(len.saturating_sub(1));
                self.set_status(format!("Deleted '{}'", keyword));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to delete custom keyword");
                self.set_status(format!("Error: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::AutoplayPolicy;
    use crate::shorts::{builtin_catalog, FeedSettings, DEFAULT_KEYWORDS};
    use crate::storage::SELECTED_KEYWORDS_KEY;
    use tokio::time::{self, Duration};

    async fn test_app_with(config: Config) -> App {
        let db = Database::open(":memory:").await.unwrap();
        let mut feed = ShortsFeed::load(&db, builtin_catalog(), FeedSettings::default()).await;
        let mut player = SimulatedPlayer::new(config.autoplay_policy);
        feed.start(&mut player);
        feed.set_item_height(20);
        App::new(db, feed, player, &config)
    }

    async fn test_app() -> App {
        test_app_with(Config::default()).await
    }

    fn custom_index() -> usize {
        DEFAULT_KEYWORDS.len()
    }

    // Status message expiry with time control
    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        // Create app before pausing time to avoid DB connection timeout
        let mut app = test_app().await;
        time::pause();
        app.set_status("Test message");

        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some()); // Still present at 2s

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_none()); // Expired after 3s
    }

    #[tokio::test]
    async fn test_unknown_theme_falls_back_to_dark() {
        let config = Config {
            theme: "neon".to_string(),
            ..Config::default()
        };
        let app = test_app_with(config).await;
        assert_eq!(app.theme_variant, ThemeVariant::Dark);
    }

    #[tokio::test]
    async fn test_cycle_theme() {
        let mut app = test_app().await;
        app.needs_redraw = false;
        assert_eq!(app.cycle_theme(), "Light");
        assert!(app.needs_redraw);
        assert_eq!(app.cycle_theme(), "Dark");
    }

    #[tokio::test]
    async fn test_picker_toggle_and_apply() {
        let mut app = test_app().await;
        app.open_picker();
        assert!(app.picker_open());

        // Cursor starts on the first default keyword (강아지)
        app.toggle_keyword_at_cursor().unwrap();
        app.apply_picker().await;

        assert!(!app.picker_open());
        assert_eq!(app.feed.visible().len(), 3);
        let stored = app.db.get_preference(SELECTED_KEYWORDS_KEY).await.unwrap();
        assert_eq!(stored.as_deref(), Some(r#"["강아지"]"#));
    }

    #[tokio::test]
    async fn test_picker_cursor_bounds() {
        let mut app = test_app().await;
        app.open_picker();
        app.picker_up();
        assert_eq!(app.picker.cursor, 0);
        for _ in 0..50 {
            app.picker_down();
        }
        assert_eq!(app.picker.cursor, DEFAULT_KEYWORDS.len() - 1);
        assert_eq!(app.keyword_at_cursor(), Some("EDM"));
    }

    #[tokio::test]
    async fn test_cancel_picker_discards_draft() {
        let mut app = test_app().await;
        app.open_picker();
        app.toggle_keyword_at_cursor().unwrap();
        app.cancel_picker();

        assert!(!app.picker_open());
        assert!(app.feed.selection().committed().is_empty());
        assert_eq!(app.feed.visible().len(), 16);
    }

    #[tokio::test]
    async fn test_add_custom_keyword_via_entry() {
        let mut app = test_app().await;
        app.open_picker();
        app.begin_keyword_entry();
        for c in " 여행 ".chars() {
            app.keyword_entry_push(c);
        }
        app.submit_keyword_entry().await;

        assert!(!app.is_entering_keyword());
        assert!(app.feed.keywords().is_custom("여행"));
        assert_eq!(app.picker.cursor, custom_index());
        assert!(app.picker_open());
    }

    #[tokio::test]
    async fn test_duplicate_entry_stays_open() {
        let mut app = test_app().await;
        app.open_picker();
        app.begin_keyword_entry();
        for c in "힙합".chars() {
            app.keyword_entry_push(c);
        }
        app.submit_keyword_entry().await;

        assert!(app.is_entering_keyword());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("already exists"));
    }

    #[tokio::test]
    async fn test_entry_refused_when_full() {
        let mut app = test_app().await;
        for k in ["a", "b", "c", "d", "e"] {
            app.feed.add_custom_keyword(&app.db, k).await.unwrap();
        }
        app.open_picker();
        app.begin_keyword_entry();
        assert!(!app.is_entering_keyword());
    }

    #[tokio::test]
    async fn test_delete_only_custom_keywords() {
        let mut app = test_app().await;
        app.feed.add_custom_keyword(&app.db, "여행").await.unwrap();
        app.open_picker();

        app.delete_keyword_at_cursor().await; // 강아지, built-in
        assert_eq!(app.feed.keywords().all().count(), DEFAULT_KEYWORDS.len() + 1);

        app.picker.cursor = custom_index();
        app.toggle_keyword_at_cursor().unwrap();
        app.delete_keyword_at_cursor().await;
        assert!(!app.feed.keywords().is_custom("여행"));
        assert!(!app.feed.selection().draft().unwrap().contains("여행"));
        assert_eq!(app.picker.cursor, custom_index() - 1);
    }

    #[tokio::test]
    async fn test_entry_ignores_control_chars() {
        let mut app = test_app().await;
        app.open_picker();
        app.begin_keyword_entry();
        app.keyword_entry_push('\u{7}');
        app.keyword_entry_push('x');
        assert_eq!(app.picker.input.as_deref(), Some("x"));
        app.keyword_entry_pop();
        assert_eq!(app.picker.input.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_toggle_play_grants_activation() {
        let config = Config {
            autoplay_policy: AutoplayPolicy::BlockUntilInteraction,
            ..Config::default()
        };
        let mut app = test_app_with(config).await;
        assert!(!app.feed.playback().is_playing());

        app.toggle_play();
        assert!(app.feed.playback().is_playing());
        assert!(app.player.is_playing("s1"));
    }

    #[tokio::test]
    async fn test_tick_settles_scroll() {
        let mut app = test_app().await;
        let now = Instant::now();
        app.feed.scroll_items(1, now);
        assert!(app.tick(now + Duration::from_millis(150)));
        assert_eq!(app.feed.playback().active_index(), Some(1));
        assert!(app.player.is_playing("s2"));
        assert!(!app.player.is_playing("s1"));
    }
}

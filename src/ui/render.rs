//! Render functions for the TUI.
//!
//! This module handles all rendering logic: the feed view, the status bar
//! and whichever overlay is open.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{feed, help, keywords, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Main render dispatch function.
///
/// Handles terminal size validation before rendering. Takes `&mut App`
/// because the feed records the card height from the current layout.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        // For very small terminals (less than 3 lines), just show minimal message
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    feed::render(f, app, chunks[0]);
    status::render(f, app, chunks[1]);

    if app.picker_open() {
        keywords::render(f, app);
    }

    // Help goes on top of everything
    if app.show_help {
        help::render(f, app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::player::SimulatedPlayer;
    use crate::shorts::{builtin_catalog, FeedSettings, ShortsFeed};
    use crate::storage::Database;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let config = Config::default();
        let mut feed = ShortsFeed::load(&db, builtin_catalog(), FeedSettings::default()).await;
        let mut player = SimulatedPlayer::new(config.autoplay_policy);
        feed.start(&mut player);
        App::new(db, feed, player, &config)
    }

    fn draw(app: &mut App, width: u16, height: u16) -> Buffer {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn buffer_text(buffer: &Buffer) -> String {
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[tokio::test]
    async fn test_render_sets_item_height() {
        let mut app = test_app().await;
        draw(&mut app, 100, 30);
        // 30 rows minus the status bar
        assert_eq!(app.feed.item_height(), 29);
        let text = buffer_text(&draw(&mut app, 100, 30));
        assert!(text.contains("dog_daily"));
    }

    #[tokio::test]
    async fn test_render_too_small() {
        let mut app = test_app().await;
        let text = buffer_text(&draw(&mut app, 40, 8));
        assert!(text.contains("Terminal too small"));
        assert_eq!(app.feed.item_height(), 0);
    }

    #[tokio::test]
    async fn test_render_empty_feed() {
        let mut app = test_app().await;
        app.feed.add_custom_keyword(&app.db, "zzz").await.unwrap();
        app.open_picker();
        app.picker.cursor = 12;
        app.toggle_keyword_at_cursor().unwrap();
        app.apply_picker().await;

        let text = buffer_text(&draw(&mut app, 100, 30));
        assert!(text.contains("No videos match"));
    }

    #[tokio::test]
    async fn test_render_overlays() {
        let mut app = test_app().await;
        app.open_picker();
        let text = buffer_text(&draw(&mut app, 100, 30));
        assert!(text.contains("Keywords (0 selected)"));

        app.show_help = true;
        let text = buffer_text(&draw(&mut app, 100, 30));
        assert!(text.contains("Help"));
    }
}

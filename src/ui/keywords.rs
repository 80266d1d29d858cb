//! Keyword picker overlay.
//!
//! Shows built-in and custom keywords as a checklist over the draft
//! selection, with per-keyword catalog counts and the custom keyword entry
//! line.

use crate::app::App;
use crate::shorts::MAX_CUSTOM_KEYWORDS;
use crate::util::strip_control_chars;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the keyword picker on top of the feed.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let width = 44u16.min(area.width.saturating_sub(4));
    let height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 20 || overlay.height < 8 {
        return;
    }

    f.render_widget(Clear, overlay);

    let Some(draft) = app.feed.selection().draft() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("modal_border"))
        .title(format!(" Keywords ({} selected) ", draft.len()));
    let inner = block.inner(overlay);
    f.render_widget(block, overlay);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let counts = app.feed.keyword_counts();
    let items: Vec<ListItem> = app
        .feed
        .keywords()
        .all()
        .enumerate()
        .map(|(i, keyword)| {
            let checked = draft.contains(keyword);
            let is_custom = app.feed.keywords().is_custom(keyword);

            let mut style = if checked {
                app.style("keyword_checked")
            } else {
                app.style("keyword_unchecked")
            };
            if i == app.picker.cursor {
                style = style.patch(app.style("keyword_cursor"));
            }

            let mut spans = vec![
                Span::styled(if checked { "[x] " } else { "[ ] " }, style),
                Span::styled(strip_control_chars(keyword).into_owned(), style),
            ];
            let count = counts.get(keyword).copied().unwrap_or(0);
            spans.push(Span::styled(
                format!(" ({})", count),
                app.style("keyword_count"),
            ));
            if is_custom {
                spans.push(Span::styled(" *", app.style("keyword_custom")));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.picker.cursor));
    f.render_stateful_widget(List::new(items), chunks[0], &mut state);

    let footer = match &app.picker.input {
        Some(input) => vec![
            Line::from(Span::styled(
                format!("New keyword: {}_", input),
                app.style("modal_input"),
            )),
            Line::from(Span::styled(
                "(Enter) Add  (Esc) Back",
                app.style("keyword_count"),
            )),
        ],
        None => vec![
            Line::from(Span::styled(
                format!(
                    "Custom keywords: {}/{}  (* = custom)",
                    app.feed.keywords().custom_keywords().len(),
                    MAX_CUSTOM_KEYWORDS
                ),
                app.style("keyword_count"),
            )),
            Line::from(Span::styled(
                "(Enter) Apply  (Esc) Cancel",
                app.style("keyword_count"),
            )),
        ],
    };
    f.render_widget(Paragraph::new(footer), chunks[1]);
}

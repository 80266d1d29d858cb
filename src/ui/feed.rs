//! Feed view: the scrolling stack of video cards and the side list.
//!
//! Each visible item occupies exactly one card height. While a scroll is in
//! flight the offset can sit between two items, in which case the lower part
//! of one card and the upper part of the next are drawn.

use crate::app::App;
use crate::shorts::FeedItem;
use crate::util::{format_count, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;

/// Render the feed area (cards + side list).
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    render_cards(f, app, chunks[0]);
    render_side_list(f, app, chunks[1]);
}

fn render_cards(f: &mut Frame, app: &mut App, area: Rect) {
    app.feed.set_item_height(u32::from(area.height));
    let app: &App = app;

    if app.feed.visible().is_empty() {
        render_empty(f, app, area);
        return;
    }

    let height = app.feed.item_height().max(1);
    let offset = app.feed.scroll_offset();
    let top = usize::try_from(offset / height).unwrap_or(usize::MAX);
    // within < height <= u16::MAX, since height came from a u16
    let within = u16::try_from(offset % height).unwrap_or(0);

    if let Some(item) = app.feed.visible().get(top) {
        let rect = Rect {
            height: area.height.saturating_sub(within),
            ..area
        };
        let borders = if within == 0 {
            Borders::ALL
        } else {
            Borders::LEFT | Borders::RIGHT | Borders::BOTTOM
        };
        render_card(f, app, top, item, rect, borders, within);
    }

    if within > 0 {
        if let Some(item) = app.feed.visible().get(top + 1) {
            let visible_rows = area.height.saturating_sub(within);
            let rect = Rect {
                y: area.y + visible_rows,
                height: within,
                ..area
            };
            render_card(
                f,
                app,
                top + 1,
                item,
                rect,
                Borders::LEFT | Borders::RIGHT | Borders::TOP,
                0,
            );
        }
    }
}

fn render_card(
    f: &mut Frame,
    app: &App,
    index: usize,
    item: &FeedItem,
    area: Rect,
    borders: Borders,
    skip_rows: u16,
) {
    if area.height == 0 {
        return;
    }

    let is_active = app.feed.playback().active_index() == Some(index);
    let border_style = if is_active {
        app.style("card_border_active")
    } else {
        app.style("card_border")
    };

    let total = app.feed.visible().len();
    let block = Block::default()
        .borders(borders)
        .border_style(border_style)
        .title(format!(" {}/{} ", index + 1, total));

    let inner_width = usize::from(area.width.saturating_sub(2));
    let lines = if app.feed.playback().is_attached(&item.id) {
        card_lines(app, item, is_active, inner_width)
    } else {
        placeholder_lines(app, item, inner_width)
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((skip_rows, 0));
    f.render_widget(paragraph, area);
}

/// Full card for an item holding media.
fn card_lines<'a>(app: &App, item: &'a FeedItem, is_active: bool, width: usize) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    lines.push(Line::from(playback_spans(app, item, is_active, width)));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        item.title.as_str(),
        app.style("card_title"),
    )));
    lines.push(Line::from(Span::styled(
        format!("@{}", item.author),
        app.style("card_author"),
    )));
    lines.push(Line::from(""));

    if !item.description.is_empty() {
        lines.push(Line::from(Span::styled(
            item.description.as_str(),
            app.style("card_body"),
        )));
        lines.push(Line::from(""));
    }

    if !item.keywords.is_empty() {
        let tags = item
            .keywords
            .iter()
            .map(|k| format!("#{}", k))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(Line::from(Span::styled(tags, app.style("card_keyword"))));
    }

    let liked = app.feed.likes().is_liked(&item.id);
    let heart = if liked { "♥" } else { "♡" };
    let like_style = if liked {
        app.style("card_liked")
    } else {
        app.style("card_meta")
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!("{} {}", heart, format_count(app.feed.like_count(item))),
            like_style,
        ),
        Span::styled(
            format!(
                "   views {}   comments {}",
                format_count(item.views),
                format_count(item.comments)
            ),
            app.style("card_meta"),
        ),
    ]));

    lines
}

/// Play state, progress bar and clock for an attached item.
fn playback_spans<'a>(app: &App, item: &FeedItem, is_active: bool, width: usize) -> Vec<Span<'a>> {
    let Some(slot) = app.player.slot(&item.id) else {
        return vec![Span::styled(item.duration.clone(), app.style("card_meta"))];
    };

    let (label, style) = if slot.playing {
        let label = if slot.muted { "▶ muted" } else { "▶" };
        (label, app.style("card_playing"))
    } else if is_active {
        ("⏸", app.style("card_paused"))
    } else {
        ("·", app.style("card_meta"))
    };

    let clock = format!(
        " {} / {}",
        format_clock(slot.position),
        if slot.length.is_zero() {
            item.duration.clone()
        } else {
            format_clock(slot.length)
        }
    );

    let bar_width = width.saturating_sub(label.chars().count() + clock.chars().count() + 2);
    let filled = if slot.length.is_zero() {
        0
    } else {
        let ratio = slot.position.as_secs_f64() / slot.length.as_secs_f64();
        ((ratio * bar_width as f64) as usize).min(bar_width)
    };

    vec![
        Span::styled(label, style),
        Span::raw(" "),
        Span::styled("━".repeat(filled), style),
        Span::styled("─".repeat(bar_width - filled), app.style("card_meta")),
        Span::styled(clock, app.style("card_meta")),
    ]
}

/// Lightweight card for an item outside the media window.
fn placeholder_lines<'a>(app: &App, item: &FeedItem, width: usize) -> Vec<Line<'a>> {
    vec![
        Line::from(Span::styled(
            truncate_to_width(&item.title, width).into_owned(),
            app.style("card_placeholder"),
        )),
        Line::from(Span::styled(
            format!("@{} · {}", item.author, item.duration),
            app.style("card_placeholder"),
        )),
    ]
}

fn render_empty(f: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No videos match the selected keywords.",
            app.style("empty_message"),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press [f] to change keywords or [c] to clear the filter.",
            app.style("empty_message"),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border")),
        );
    f.render_widget(paragraph, area);
}

/// Render the side list of visible items, marking the ones holding media.
fn render_side_list(f: &mut Frame, app: &App, area: Rect) {
    let active = app.feed.playback().active_index();
    let width = usize::from(area.width.saturating_sub(6));

    let items: Vec<ListItem> = app
        .feed
        .visible()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let loaded = app.feed.playback().is_attached(&item.id);
            let marker = if loaded {
                Span::styled("● ", app.style("list_loaded"))
            } else {
                Span::raw("  ")
            };
            let style = if Some(i) == active {
                app.style("list_active")
            } else {
                app.style("list_normal")
            };
            let liked = if app.feed.likes().is_liked(&item.id) {
                Span::styled(" ♥", app.style("card_liked"))
            } else {
                Span::raw("")
            };
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(truncate_to_width(&item.title, width).into_owned(), style),
                liked,
            ]))
        })
        .collect();

    let committed = app.feed.selection().committed();
    let title = if committed.is_empty() {
        format!(" All videos ({}) ", app.feed.visible().len())
    } else {
        format!(
            " {} of {} · {} keywords ",
            app.feed.visible().len(),
            app.feed.catalog().len(),
            committed.len()
        )
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("panel_border"))
            .title(title),
    );

    let mut state = ListState::default().with_selected(active);
    f.render_stateful_widget(list, area, &mut state);
}

/// `m:ss` clock label.
fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::ZERO), "0:00");
        assert_eq!(format_clock(Duration::from_millis(32_900)), "0:32");
        assert_eq!(format_clock(Duration::from_secs(61)), "1:01");
    }
}

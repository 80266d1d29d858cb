//! Help overlay: keybinding reference.
//!
//! Lists the live bindings (config overrides included) per context, with
//! every key of an action on one row.

use crate::app::App;
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Context display order and labels for the help screen.
const CONTEXT_ORDER: [(Context, &str); 3] = [
    (Context::Global, "General"),
    (Context::Feed, "Feed"),
    (Context::Keywords, "Keyword Picker"),
];

/// Width of the key column.
const KEY_COLUMN: usize = 18;

/// One help row: joined keys and the action description.
#[derive(Debug, PartialEq, Eq)]
struct HelpRow {
    keys: String,
    description: &'static str,
}

/// Group bindings of one context by action, keeping first-bound order.
fn rows_for(bindings: &[(Context, String, Action, &'static str)], context: Context) -> Vec<HelpRow> {
    let mut order: Vec<Action> = Vec::new();
    let mut rows: Vec<HelpRow> = Vec::new();
    for (ctx, key, action, description) in bindings {
        if *ctx != context {
            continue;
        }
        match order.iter().position(|a| a == action) {
            Some(i) => {
                rows[i].keys.push_str(", ");
                rows[i].keys.push_str(key);
            }
            None => {
                order.push(*action);
                rows.push(HelpRow {
                    keys: key.clone(),
                    description: *description,
                });
            }
        }
    }
    rows
}

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let width = 60u16.min(area.width.saturating_sub(4));
    let height = area.height.saturating_sub(4);
    let overlay = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let bindings = app.keybindings.all_bindings();
    let heading = app.style("card_title").add_modifier(Modifier::UNDERLINED);

    let mut lines: Vec<Line> = Vec::new();
    for (ctx, label) in CONTEXT_ORDER {
        let rows = rows_for(&bindings, ctx);
        if rows.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(label, heading)));
        for row in rows {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<width$}", row.keys, width = KEY_COLUMN),
                    app.style("card_keyword"),
                ),
                Span::styled(row.description, app.style("card_body")),
            ]));
        }
    }

    let visible_height = usize::from(overlay.height.saturating_sub(2));
    let max_scroll = lines.len().saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) j/k scroll ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("modal_border"))
                .title(title),
        )
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));

    f.render_widget(paragraph, overlay);
}

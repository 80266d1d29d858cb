use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Status bar needs at least 1 char width to be meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    let mut style = app.style("status_bar");

    // Use Cow to avoid allocations for static hints and borrowed status messages
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        if msg.starts_with("Error") {
            style = app.style("status_error");
        }
        Cow::Borrowed(msg.as_ref())
    } else if app.is_entering_keyword() {
        Cow::Borrowed("Type a keyword | ENTER add | ESC back")
    } else if app.picker_open() {
        Cow::Borrowed("[space]toggle [a]dd [d]elete [r]eset [Enter]apply [Esc]cancel")
    } else {
        Cow::Borrowed("[j/k]scroll [n/p]next/prev [space]play [l]ike [f]keywords [?]help [q]uit")
    };

    let paragraph = Paragraph::new(text).style(style);
    f.render_widget(paragraph, area);
}

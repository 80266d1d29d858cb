//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on which overlay is open.

use crate::app::App;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Main input dispatch function.
///
/// Priority: help overlay, then keyword text entry, then the keyword
/// picker, then the feed.
pub(super) async fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    // Handle help overlay input first (captures all keys when visible)
    if app.show_help {
        return handle_help_input(app, code);
    }

    // Text entry captures raw characters, so bound keys like 'q' can be typed
    if app.is_entering_keyword() {
        return handle_keyword_entry(app, code, modifiers).await;
    }

    if app.picker_open() {
        return handle_picker_input(app, code, modifiers).await;
    }

    handle_feed_input(app, code, modifiers).await
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Actions available everywhere outside text entry.
///
/// Returns `None` if the action is not a global one.
fn handle_global(app: &mut App, action: KbAction) -> Option<Action> {
    match action {
        KbAction::Quit => Some(Action::Quit),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
            Some(Action::Continue)
        }
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
            Some(Action::Continue)
        }
        _ => None,
    }
}

/// Handle input on the feed.
async fn handle_feed_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Feed)
    else {
        return Action::Continue;
    };
    if let Some(result) = handle_global(app, action) {
        return result;
    }

    let step = i64::from(app.scroll_step);
    match action {
        KbAction::ScrollDown => app.scroll(step),
        KbAction::ScrollUp => app.scroll(-step),
        KbAction::NextItem => app.step_items(1),
        KbAction::PrevItem => app.step_items(-1),
        KbAction::TogglePlay => app.toggle_play(),
        KbAction::ToggleLike => app.toggle_like(),
        KbAction::OpenKeywords => app.open_picker(),
        KbAction::ClearFilter => {
            if app.feed.selection().committed().is_empty() {
                app.set_status("No keyword filter active");
            } else {
                app.clear_filter().await;
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the keyword picker is open.
async fn handle_picker_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Keywords)
    else {
        return Action::Continue;
    };
    if let Some(result) = handle_global(app, action) {
        return result;
    }

    match action {
        KbAction::NavDown => app.picker_down(),
        KbAction::NavUp => app.picker_up(),
        KbAction::ToggleKeyword => {
            if let Err(e) = app.toggle_keyword_at_cursor() {
                tracing::warn!(error = %e, "Keyword toggle ignored");
            }
        }
        KbAction::ResetKeywords => {
            if let Err(e) = app.reset_picker() {
                tracing::warn!(error = %e, "Keyword reset ignored");
            }
        }
        KbAction::ApplyKeywords => app.apply_picker().await,
        KbAction::CancelKeywords => app.cancel_picker(),
        KbAction::AddKeyword => app.begin_keyword_entry(),
        KbAction::DeleteKeyword => app.delete_keyword_at_cursor().await,
        _ => {}
    }
    Action::Continue
}

/// Handle input while typing a new custom keyword.
///
/// Enter submits, Esc abandons the entry (the picker stays open), Ctrl+C
/// still quits.
async fn handle_keyword_entry(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => {}
        KeyCode::Char(c) => app.keyword_entry_push(c),
        KeyCode::Backspace => app.keyword_entry_pop(),
        KeyCode::Enter => app.submit_keyword_entry().await,
        KeyCode::Esc => app.cancel_keyword_entry(),
        _ => {}
    }
    Action::Continue
}

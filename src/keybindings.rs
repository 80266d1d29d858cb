//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Lookup is context-aware so the same key can scroll the feed and move the
//! cursor in the keyword picker. User overrides come from the `[keybindings]`
//! table in config.toml.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ShowHelp,
    CycleTheme,
    ScrollDown,
    ScrollUp,
    NextItem,
    PrevItem,
    TogglePlay,
    ToggleLike,
    OpenKeywords,
    ClearFilter,
    NavDown,
    NavUp,
    ToggleKeyword,
    ApplyKeywords,
    CancelKeywords,
    ResetKeywords,
    AddKeyword,
    DeleteKeyword,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::ShowHelp => "Show help",
            Self::CycleTheme => "Cycle theme",
            Self::ScrollDown => "Scroll down",
            Self::ScrollUp => "Scroll up",
            Self::NextItem => "Next video",
            Self::PrevItem => "Previous video",
            Self::TogglePlay => "Play / pause",
            Self::ToggleLike => "Like / unlike",
            Self::OpenKeywords => "Choose keywords",
            Self::ClearFilter => "Clear keyword filter",
            Self::NavDown => "Move down",
            Self::NavUp => "Move up",
            Self::ToggleKeyword => "Check / uncheck keyword",
            Self::ApplyKeywords => "Apply selection",
            Self::CancelKeywords => "Cancel",
            Self::ResetKeywords => "Uncheck all",
            Self::AddKeyword => "Add custom keyword",
            Self::DeleteKeyword => "Delete custom keyword",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Feed,
    Keywords,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Space", "PageDown"
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "pageup" => return Some(KeySpec::plain(KeyCode::PageUp)),
        "pagedown" => return Some(KeySpec::plain(KeyCode::PageDown)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "delete" | "del" => return Some(KeySpec::plain(KeyCode::Delete)),
        "space" => return Some(KeySpec::plain(KeyCode::Char(' '))),
        _ => {}
    }

    if let Some(n) = s.strip_prefix(['F', 'f']).and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Some(KeySpec::plain(KeyCode::F(n)));
        }
        return None;
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
pub struct KeybindingRegistry {
    /// Primary lookup: (Context, KeySpec) -> Action
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings for help screen enumeration
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    /// Create a registry with the default bindings.
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use KeyCode::*;

        // === Global ===
        self.bind(Context::Global, KeySpec::plain(Char('q')), Action::Quit);
        self.bind(Context::Global, KeySpec::ctrl('c'), Action::Quit);
        self.bind(Context::Global, KeySpec::plain(Char('?')), Action::ShowHelp);
        self.bind(Context::Global, KeySpec::plain(Char('t')), Action::CycleTheme);

        // === Feed ===
        self.bind(Context::Feed, KeySpec::plain(Char('j')), Action::ScrollDown);
        self.bind(Context::Feed, KeySpec::plain(Down), Action::ScrollDown);
        self.bind(Context::Feed, KeySpec::plain(Char('k')), Action::ScrollUp);
        self.bind(Context::Feed, KeySpec::plain(Up), Action::ScrollUp);
        self.bind(Context::Feed, KeySpec::plain(Char('n')), Action::NextItem);
        self.bind(Context::Feed, KeySpec::plain(PageDown), Action::NextItem);
        self.bind(Context::Feed, KeySpec::plain(Char('p')), Action::PrevItem);
        self.bind(Context::Feed, KeySpec::plain(PageUp), Action::PrevItem);
        self.bind(Context::Feed, KeySpec::plain(Char(' ')), Action::TogglePlay);
        self.bind(Context::Feed, KeySpec::plain(Char('l')), Action::ToggleLike);
        self.bind(Context::Feed, KeySpec::plain(Char('f')), Action::OpenKeywords);
        self.bind(Context::Feed, KeySpec::plain(Char('/')), Action::OpenKeywords);
        self.bind(Context::Feed, KeySpec::plain(Char('c')), Action::ClearFilter);

        // === Keyword picker ===
        self.bind(Context::Keywords, KeySpec::plain(Char('j')), Action::NavDown);
        self.bind(Context::Keywords, KeySpec::plain(Down), Action::NavDown);
        self.bind(Context::Keywords, KeySpec::plain(Char('k')), Action::NavUp);
        self.bind(Context::Keywords, KeySpec::plain(Up), Action::NavUp);
        self.bind(Context::Keywords, KeySpec::plain(Char(' ')), Action::ToggleKeyword);
        self.bind(Context::Keywords, KeySpec::plain(Enter), Action::ApplyKeywords);
        self.bind(Context::Keywords, KeySpec::plain(Esc), Action::CancelKeywords);
        self.bind(Context::Keywords, KeySpec::plain(Char('r')), Action::ResetKeywords);
        self.bind(Context::Keywords, KeySpec::plain(Char('a')), Action::AddKeyword);
        self.bind(Context::Keywords, KeySpec::plain(Char('d')), Action::DeleteKeyword);
        self.bind(Context::Keywords, KeySpec::plain(Delete), Action::DeleteKeyword);
    }

    /// Apply user overrides from the config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "next_item").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5"). The new key
    /// replaces every default key of that action, in the same contexts.
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            if let Some(&action) = self.lookup.get(&(Context::Global, key)) {
                return Some(action);
            }
        }

        None
    }

    /// All bindings for the help screen as
    /// (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "show_help" | "help" => Some(Action::ShowHelp),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "scroll_down" => Some(Action::ScrollDown),
        "scroll_up" => Some(Action::ScrollUp),
        "next_item" | "next" => Some(Action::NextItem),
        "prev_item" | "prev" | "previous" => Some(Action::PrevItem),
        "toggle_play" | "play" => Some(Action::TogglePlay),
        "toggle_like" | "like" => Some(Action::ToggleLike),
        "open_keywords" | "keywords" | "filter" => Some(Action::OpenKeywords),
        "clear_filter" => Some(Action::ClearFilter),
        "nav_down" => Some(Action::NavDown),
        "nav_up" => Some(Action::NavUp),
        "toggle_keyword" => Some(Action::ToggleKeyword),
        "apply_keywords" | "apply" => Some(Action::ApplyKeywords),
        "cancel_keywords" | "cancel" => Some(Action::CancelKeywords),
        "reset_keywords" | "reset" => Some(Action::ResetKeywords),
        "add_keyword" => Some(Action::AddKeyword),
        "delete_keyword" => Some(Action::DeleteKeyword),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

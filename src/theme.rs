//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Video card --
    pub card_border: Style,
    pub card_border_active: Style,
    pub card_title: Style,
    pub card_author: Style,
    pub card_body: Style,
    pub card_meta: Style,
    pub card_keyword: Style,
    pub card_placeholder: Style,
    pub card_liked: Style,
    pub card_playing: Style,
    pub card_paused: Style,

    // -- Side list --
    pub list_normal: Style,
    pub list_active: Style,
    pub list_loaded: Style,

    // -- Keyword modal --
    pub modal_border: Style,
    pub keyword_checked: Style,
    pub keyword_unchecked: Style,
    pub keyword_cursor: Style,
    pub keyword_custom: Style,
    pub keyword_count: Style,
    pub modal_input: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_error: Style,
    pub panel_border: Style,
    pub empty_message: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            // Video card
            card_border: Style::default().fg(Color::DarkGray),
            card_border_active: Style::default().fg(Color::Cyan),
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_author: Style::default().fg(Color::Cyan),
            card_body: Style::default(),
            card_meta: Style::default().fg(Color::Gray),
            card_keyword: Style::default().fg(Color::Yellow),
            card_placeholder: Style::default().fg(Color::DarkGray),
            card_liked: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            card_playing: Style::default().fg(Color::Green),
            card_paused: Style::default().fg(Color::Yellow),

            // Side list
            list_normal: Style::default(),
            list_active: Style::default().bg(Color::DarkGray).fg(Color::White),
            list_loaded: Style::default().fg(Color::Green),

            // Keyword modal
            modal_border: Style::default().fg(Color::Yellow),
            keyword_checked: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            keyword_unchecked: Style::default(),
            keyword_cursor: Style::default().bg(Color::DarkGray).fg(Color::White),
            keyword_custom: Style::default().fg(Color::Magenta),
            keyword_count: Style::default().fg(Color::DarkGray),
            modal_input: Style::default().fg(Color::Yellow),

            // Chrome
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::Red).fg(Color::White),
            panel_border: Style::default(),
            empty_message: Style::default().fg(Color::Gray),
        }
    }

    fn light() -> Self {
        Self {
            // Video card
            card_border: Style::default().fg(Color::Gray),
            card_border_active: Style::default().fg(Color::Blue),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_author: Style::default().fg(Color::Blue),
            card_body: Style::default().fg(Color::Black),
            card_meta: Style::default().fg(Color::DarkGray),
            card_keyword: Style::default().fg(Color::Magenta),
            card_placeholder: Style::default().fg(Color::Gray),
            card_liked: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            card_playing: Style::default().fg(Color::Green),
            card_paused: Style::default().fg(Color::Magenta),

            // Side list
            list_normal: Style::default().fg(Color::Black),
            list_active: Style::default().bg(Color::Blue).fg(Color::White),
            list_loaded: Style::default().fg(Color::Green),

            // Keyword modal
            modal_border: Style::default().fg(Color::Magenta),
            keyword_checked: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            keyword_unchecked: Style::default().fg(Color::Black),
            keyword_cursor: Style::default().bg(Color::Blue).fg(Color::White),
            keyword_custom: Style::default().fg(Color::Magenta),
            keyword_count: Style::default().fg(Color::DarkGray),
            modal_input: Style::default().fg(Color::Blue),

            // Chrome
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().bg(Color::Red).fg(Color::White),
            panel_border: Style::default().fg(Color::DarkGray),
            empty_message: Style::default().fg(Color::DarkGray),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup.
///
/// Built from a `ColorPalette`, this allows resolving role names (e.g.
/// `"card_title"`) to their concrete `Style` at runtime.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 25] = [
    "card_border",
    "card_border_active",
    "card_title",
    "card_author",
    "card_body",
    "card_meta",
    "card_keyword",
    "card_placeholder",
    "card_liked",
    "card_playing",
    "card_paused",
    "list_normal",
    "list_active",
    "list_loaded",
    "modal_border",
    "keyword_checked",
    "keyword_unchecked",
    "keyword_cursor",
    "keyword_custom",
    "keyword_count",
    "modal_input",
    "status_bar",
    "status_error",
    "panel_border",
    "empty_message",
];

impl StyleMap {
    /// Build a `StyleMap` from a `ColorPalette`.
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 25] = [
            p.card_border,
            p.card_border_active,
            p.card_title,
            p.card_author,
            p.card_body,
            p.card_meta,
            p.card_keyword,
            p.card_placeholder,
            p.card_liked,
            p.card_playing,
            p.card_paused,
            p.list_normal,
            p.list_active,
            p.list_loaded,
            p.modal_border,
            p.keyword_checked,
            p.keyword_unchecked,
            p.keyword_cursor,
            p.keyword_custom,
            p.keyword_count,
            p.modal_input,
            p.status_bar,
            p.status_error,
            p.panel_border,
            p.empty_message,
        ];

        let map = ROLE_NAMES
            .iter()
            .zip(styles.iter())
            .map(|(name, style)| (*name, *style))
            .collect();

        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

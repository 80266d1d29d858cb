use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::MAX_KEYWORD_LENGTH;

/// Ellipsis appended to truncated text
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns.
///
/// Hangul syllables and most emoji take two columns; combining marks take none.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncates `s` to at most `max_width` terminal columns.
///
/// Appends "..." when text is cut. Widths of 3 or less are filled with as many
/// characters as fit, without an ellipsis. Returns `Cow::Borrowed` when the
/// string already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(take_columns(s, max_width).to_string());
    }
    let head = take_columns(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", head, ELLIPSIS))
}

/// Longest prefix of `s` that fits in `columns`.
fn take_columns(s: &str, columns: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > columns {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Removes control characters (including ESC, so no ANSI sequence survives).
///
/// Keywords are single-line, so newlines and tabs are stripped as well.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(char::is_control) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|c| !c.is_control()).collect())
}

/// Normalizes user-typed keyword text: control characters stripped, outer
/// whitespace trimmed, inner whitespace runs collapsed to one space, length
/// capped at [`MAX_KEYWORD_LENGTH`] chars.
///
/// Returns an empty string when nothing printable remains.
pub fn sanitize_keyword(raw: &str) -> String {
    let clean = strip_control_chars(raw);
    let collapsed = clean.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_KEYWORD_LENGTH).collect::<String>().trim_end().to_string()
}

/// Formats a counter with thousands separators (`12345` → `"12,345"`).
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parses a clip duration label (`"45"`, `"0:45"`, `"1:02:03"`) into seconds.
///
/// Returns `None` for empty or malformed labels.
pub fn parse_duration_secs(label: &str) -> Option<u64> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let mut total: u64 = 0;
    let mut parts = 0;
    for part in label.split(':') {
        parts += 1;
        if parts > 3 || part.is_empty() {
            return None;
        }
        let value: u64 = part.parse().ok()?;
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}

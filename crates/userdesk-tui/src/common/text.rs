//! Text utilities for form fields.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Appends a typed character, ignoring control characters.
pub fn push_char(value: &mut String, ch: char) {
    if !ch.is_control() {
        value.push(ch);
    }
}

/// Appends pasted text with line breaks and control characters dropped.
pub fn push_str(value: &mut String, text: &str) {
    for ch in text.chars() {
        push_char(value, ch);
    }
}

pub fn pop_char(value: &mut String) {
    value.pop();
}

/// One `*` per character.
pub fn mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}

/// Keeps the end of `text` visible within `max_width` columns (unicode-aware),
/// prefixing `…` when the start is cut.
pub fn truncate_start(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut kept = Vec::new();
    let mut width = 0;
    for ch in text.chars().rev() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        kept.push(ch);
    }
    let mut truncated = String::from("…");
    truncated.extend(kept.into_iter().rev());
    truncated
}

//! Common helper functions for output formatting.

use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a table header line, dimmed when colors are enabled.
pub fn header_line(header: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", header.dimmed())
    } else {
        format!("{header}\n")
    }
}

/// Formats a signed change count, e.g. `+3` or `-1`. Zero renders as `-`.
pub fn format_change(sign: char, count: usize, use_colors: bool) -> String {
    if count == 0 {
        return "-".to_string();
    }
    let text = format!("{sign}{count}");
    if !use_colors {
        return text;
    }
    match sign {
        '+' => text.green().to_string(),
        '-' => text.red().to_string(),
        _ => text.yellow().to_string(),
    }
}

/// Pads `text` to `width` columns, measuring only its visible characters.
///
/// Colored strings carry escape codes, so `{:<width}` would under-pad them.
pub fn pad(text: &str, visible: &str, width: usize) -> String {
    let len = visible.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

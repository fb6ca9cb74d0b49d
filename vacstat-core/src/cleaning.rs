use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").unwrap());

// `\s` already covers U+00A0, it is listed for readability
static WHITESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\u{a0}]+").unwrap());

static LINE_BREAK_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Clean a single-valued field
/// - Strip HTML-like tags (non-greedy)
/// - Normalize unicode to NFC
/// - Collapse whitespace runs (including non-breaking spaces) to one space
/// - Trim both ends
pub fn clean_field(raw: &str) -> String {
    let without_tags = TAG_PATTERN.replace_all(raw, "");
    let composed: String = without_tags.nfc().collect();
    WHITESPACE_PATTERN
        .replace_all(&composed, " ")
        .trim()
        .to_string()
}

/// Clean a multi-valued field such as key skills.
/// The raw value is split on line breaks first, then every part is cleaned
/// on its own. Parts that end up empty are dropped.
pub fn clean_multi_value(raw: &str) -> Vec<String> {
    LINE_BREAK_PATTERN
        .split(raw)
        .map(clean_field)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Truncate a display value to `max_chars` characters, appending "..."
/// when anything was cut
pub fn truncate_display(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &value[..byte_idx]),
        None => value.to_string(),
    }
}

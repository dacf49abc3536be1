// src/utils.rs

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lower-cased search words of a keyword query
pub fn keyword_words(keyword: &str) -> Vec<String> {
    keyword
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect()
}

/// True when any of the (lower-cased) words occurs in the title, ignoring case.
/// No words means no filter.
pub fn title_matches(title: &str, words: &[String]) -> bool {
    if words.is_empty() {
        return true;
    }
    let title = title.to_lowercase();
    words.iter().any(|w| title.contains(w.as_str()))
}

/// Trimmed non-empty string, or None
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

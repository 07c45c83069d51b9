//! Text normalization helpers.

use unicode_segmentation::UnicodeSegmentation;

/// Collapses every run of Unicode whitespace to a single space and trims
/// both ends.
///
/// # Examples
///
/// ```
/// use ragchat::io::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  a\n\tb   c "), "a b c");
/// ```
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for token in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

/// Truncates to at most `max` grapheme clusters, appending `...` when
/// anything was cut.
///
/// Works on user-perceived characters so combining marks and emoji
/// sequences are never split.
#[must_use]
pub fn truncate_graphemes(s: &str, max: usize) -> String {
    let count = s.graphemes(true).count();
    if count <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.graphemes(true).take(max).collect();
    }
    let mut out: String = s.graphemes(true).take(max - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \n\t "), "");
        assert_eq!(normalize_whitespace("one"), "one");
        assert_eq!(
            normalize_whitespace("Page 1\r\n\r\nSection\u{00a0}2"),
            "Page 1 Section 2"
        );
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("Hello", 10), "Hello");
        assert_eq!(truncate_graphemes("Hello World", 8), "Hello...");
        assert_eq!(truncate_graphemes("Hello", 2), "He");
    }

    #[test]
    fn test_truncate_graphemes_keeps_clusters_whole() {
        // "e" + combining acute accent is one grapheme
        let s = "e\u{301}e\u{301}e\u{301}e\u{301}e\u{301}";
        let out = truncate_graphemes(s, 4);
        assert_eq!(out, "e\u{301}...");
    }
}

//! Whitespace normalization of availability fragments.
//!
//! Product pages re-render with different indentation and blank lines between
//! deploys. Only the visible words should decide whether a fragment changed.

use std::sync::LazyLock;

use regex::Regex;

static LINE_INDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t\u{a0}]+").expect("valid indent regex"));
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid blank line regex"));

/// Normalize a text fragment before comparing it with the snapshot.
///
/// - CRLF becomes LF
/// - leading spaces and tabs are stripped from every line
/// - runs of line breaks (including whitespace-only lines) collapse to one
/// - leading whitespace and trailing line breaks are dropped
pub fn normalize_fragment(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let text = LINE_INDENT.replace_all(&text, "");
    let text = BLANK_RUNS.replace_all(&text, "\n");
    text.trim_start().trim_end_matches('\n').to_string()
}

/// Normalize a product name: line breaks removed, surrounding whitespace trimmed.
pub fn normalize_name(text: &str) -> String {
    text.replace(['\r', '\n'], "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(normalize_fragment("In Stock"), "In Stock");
    }

    #[test]
    fn test_strips_leading_whitespace() {
        assert_eq!(normalize_fragment("\n\n   \tIn Stock"), "In Stock");
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(normalize_fragment("In Stock\n\n\n\nShips in 2 days"), "In Stock\nShips in 2 days");
    }

    #[test]
    fn test_strips_per_line_indent() {
        let raw = "\n      M\n      \n      Only 2 left\n        Ships in 3-5 days\n    ";
        assert_eq!(normalize_fragment(raw), "M\nOnly 2 left\nShips in 3-5 days");
    }

    #[test]
    fn test_whitespace_only_differences_normalize_equal() {
        let first = "\n  In Stock\n\n  Ships in 2 days\n";
        let second = "In Stock\r\n\r\n\r\n        Ships in 2 days";
        assert_eq!(normalize_fragment(first), normalize_fragment(second));
    }

    #[test]
    fn test_inner_spacing_is_kept() {
        assert_eq!(normalize_fragment("Sold  out"), "Sold  out");
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(normalize_fragment("  \n \n"), "");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("\n   Grail CF SL 7\n  "), "Grail CF SL 7");
        assert_eq!(normalize_name("Grail\nAL 6"), "GrailAL 6");
    }
}

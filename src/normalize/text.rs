//! Free-text cleanup for titles and listing snippets.
//!
//! Provider markup arrives as fragments, not documents, so tag removal is a
//! plain non-greedy pattern rather than a DOM pass. Only the four entities
//! the listings actually emit are decoded.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip markup and normalize whitespace/entities in a scraped fragment.
///
/// Removes tag-shaped substrings, maps non-breaking spaces to plain spaces,
/// drops zero-width spaces, decodes `&quot; &amp; &lt; &gt;`, collapses
/// whitespace runs to single spaces, and trims the ends.
pub fn sanitize(raw: &str) -> String {
    let stripped = TAG_RE.replace_all(raw, "");
    let decoded = stripped
        .replace('\u{a0}', " ")
        .replace('\u{200b}', "")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

/// Hard-cut `text` at `max_len - 3` characters and append an ellipsis marker
/// when it exceeds `max_len`; no-op otherwise. Counts characters, not bytes,
/// so multi-byte Korean text cannot be split mid-codepoint.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(sanitize("<b>bold</b> text"), "bold text");
        assert_eq!(sanitize("<a href=\"x\">link</a>"), "link");
    }

    #[test]
    fn test_collapses_whitespace_and_newlines() {
        assert_eq!(sanitize("a\n\n  b\t c"), "a b c");
    }

    #[test]
    fn test_decodes_common_entities() {
        assert_eq!(sanitize("&quot;x&quot; &amp; y"), "\"x\" & y");
    }

    #[test]
    fn test_strips_nbsp_and_zero_width_space() {
        assert_eq!(sanitize("a\u{a0}b"), "a b");
        assert_eq!(sanitize("a\u{200b}b"), "ab");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "<p>Some  headline</p>\n with &amp; entities",
            "plain text",
            "  \u{a0} padded \u{200b} ",
            "수소차 <b>보급</b> 확대",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_truncate_no_op_within_limit() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
    }

    #[test]
    fn test_truncate_cuts_and_marks() {
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let korean = "가나다라마바사아자차";
        let out = truncate(korean, 8);
        assert_eq!(out, "가나다라마...");
    }
}

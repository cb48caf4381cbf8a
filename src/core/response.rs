//! Discord length limits for reply embeds
//!
//! - **Version**: 2.1.0
//! - **Since**: 1.4.0
//!
//! ## Changelog
//! - 2.1.0: Field value and field count limits
//! - 2.0.0: Title limit and generic truncation; message chunking removed
//! - 1.0.0: Extracted embed truncation from the command handlers

/// Discord embed description limit
pub const EMBED_LIMIT: usize = 4096;
/// Discord embed title limit
pub const TITLE_LIMIT: usize = 256;
/// Discord embed field value limit
pub const FIELD_LIMIT: usize = 1024;
/// Fields Discord accepts in a single embed
pub const MAX_FIELDS_PER_EMBED: usize = 25;
/// Embeds Discord accepts in a single message
pub const MAX_EMBEDS_PER_MESSAGE: usize = 10;

/// Truncate to at most `limit` bytes on a char boundary, ending in "..." when cut
pub fn truncate_to(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit.saturating_sub(3);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Truncate text to fit an embed description
pub fn truncate_for_embed(text: &str) -> String {
    truncate_to(text, EMBED_LIMIT)
}

/// Truncate text to fit an embed title
pub fn truncate_for_title(text: &str) -> String {
    truncate_to(text, TITLE_LIMIT)
}

/// Truncate text to fit an embed field value
pub fn truncate_for_field(text: &str) -> String {
    truncate_to(text, FIELD_LIMIT)
}

/// Group whole lines into pages no longer than `max_size` bytes.
///
/// A single line longer than `max_size` is truncated rather than split, so
/// every page starts at the beginning of an entry.
pub fn paginate_lines<'a>(lines: impl IntoIterator<Item = &'a str>, max_size: usize) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current = String::new();

    for line in lines {
        let line = truncate_to(line, max_size);
        let needed = if current.is_empty() { line.len() } else { line.len() + 1 };
        if current.len() + needed > max_size && !current.is_empty() {
            pages.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(&line);
    }
    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_for_embed("short text"), "short text");
    }

    #[test]
    fn test_truncate_long_text() {
        let result = truncate_for_embed(&"a".repeat(5000));
        assert_eq!(result.len(), EMBED_LIMIT);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_respects_utf8() {
        // 4 bytes per char, cut lands mid-character
        let result = truncate_to(&"🎲".repeat(100), 10);
        assert_eq!(result, "🎲...");
        assert!(truncate_for_title(&"é".repeat(200)).len() <= TITLE_LIMIT);
    }

    #[test]
    fn test_paginate_keeps_lines_whole() {
        let pages = paginate_lines(["aaaa", "bbbb", "cccc"], 9);
        assert_eq!(pages, vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn test_paginate_truncates_oversized_line() {
        let long = "x".repeat(50);
        let pages = paginate_lines([long.as_str(), "tail"], 20);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].len() <= 20);
        assert_eq!(pages[1], "tail");
    }

    #[test]
    fn test_paginate_empty() {
        assert!(paginate_lines(std::iter::empty::<&str>(), 100).is_empty());
    }
}

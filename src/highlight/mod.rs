//! Match highlighting and content snippets for result display
//!
//! Highlights are HTML fragments: every case-insensitive occurrence of a
//! query term is wrapped in `<mark>`. Terms of a single character are
//! dropped before matching so typing "a" does not light up every word.

use regex::{Regex, RegexBuilder};

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";
pub const ELLIPSIS: &str = "...";

/// Whitespace-separated query terms longer than one character
pub fn query_terms(query: &str) -> Vec<&str> {
    query
        .split_whitespace()
        .filter(|t| t.chars().count() > 1)
        .collect()
}

/// One case-insensitive alternation over all terms, longest first so an
/// overlapping shorter term never cuts a longer match short.
fn terms_pattern(query: &str) -> Option<Regex> {
    let mut terms = query_terms(query);
    if terms.is_empty() {
        return None;
    }
    terms.sort_by_key(|t| std::cmp::Reverse(t.len()));

    let pattern = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!("Cannot build highlight pattern: {}", e);
            None
        }
    }
}

/// Wrap every occurrence of a query term in `text` with a highlight marker.
/// Text is returned unchanged when no term survives filtering.
pub fn highlight_text(text: &str, query: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match terms_pattern(query) {
        Some(re) => re
            .replace_all(text, |caps: &regex::Captures<'_>| {
                format!("{}{}{}", MARK_OPEN, &caps[0], MARK_CLOSE)
            })
            .into_owned(),
        None => text.to_string(),
    }
}

/// Excerpt of `content` around the first query-term match.
///
/// The window is `max_chars` wide and keeps up to `context` characters
/// before the match. Without a match the excerpt is the start of the content.
/// Ellipses mark the cut ends. Offsets count characters, not bytes.
pub fn content_snippet(content: &str, query: &str, max_chars: usize, context: usize) -> String {
    if content.is_empty() {
        return String::new();
    }
    let total = content.chars().count();

    let first_match = terms_pattern(query)
        .and_then(|re| re.find(content))
        .map(|m| content[..m.start()].chars().count());

    let Some(index) = first_match else {
        let mut snippet = char_slice(content, 0, max_chars).to_string();
        if total > max_chars {
            snippet.push_str(ELLIPSIS);
        }
        return snippet;
    };

    let start = index.saturating_sub(context);
    let end = total.min((index + max_chars).saturating_sub(context));

    let mut snippet = String::with_capacity(max_chars + 2 * ELLIPSIS.len());
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(char_slice(content, start, end));
    if end < total {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// Characters `[start, end)` of `text`
fn char_slice(text: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let byte_at = |n: usize| text.char_indices().nth(n).map(|(i, _)| i).unwrap_or(text.len());
    &text[byte_at(start)..byte_at(end)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_preserves_case() {
        assert_eq!(highlight_text("Scheduler", "sched"), "<mark>Sched</mark>uler");
    }

    #[test]
    fn test_highlight_every_occurrence() {
        assert_eq!(
            highlight_text("Node graphs and node state", "NODE"),
            "<mark>Node</mark> graphs and <mark>node</mark> state"
        );
    }

    #[test]
    fn test_single_characters_are_not_highlighted() {
        assert_eq!(highlight_text("a banana", "a"), "a banana");
        assert_eq!(highlight_text("a banana", "a b"), "a banana");
        assert_eq!(highlight_text("a banana", "a an"), "a b<mark>an</mark><mark>an</mark>a");
    }

    #[test]
    fn test_blank_query_returns_text() {
        assert_eq!(highlight_text("Scheduler", "   "), "Scheduler");
        assert_eq!(highlight_text("", "sched"), "");
    }

    #[test]
    fn test_regex_characters_are_literal() {
        assert_eq!(highlight_text("Use C++ (or C)", "c++"), "Use <mark>C++</mark> (or C)");
        assert_eq!(highlight_text("a.b and axb", "a.b"), "<mark>a.b</mark> and axb");
    }

    #[test]
    fn test_longer_terms_win() {
        assert_eq!(
            highlight_text("scheduler", "sched scheduler"),
            "<mark>scheduler</mark>"
        );
    }

    #[test]
    fn test_snippet_short_content_has_no_ellipsis() {
        let content = "The scheduler manages node execution order";
        assert_eq!(content_snippet(content, "sched", 150, 40), content);
    }

    #[test]
    fn test_snippet_centers_on_first_match() {
        let content = format!("{}needle{}", "x".repeat(100), "y".repeat(300));
        let snippet = content_snippet(&content, "needle", 150, 40);

        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        let body = &snippet[3..snippet.len() - 3];
        assert_eq!(body.chars().count(), 150);
        assert!(body.starts_with(&"x".repeat(40)));
        assert_eq!(&body[40..46], "needle");
    }

    #[test]
    fn test_snippet_uses_earliest_term() {
        let content = format!("{} beta {} alpha", "a".repeat(10), "b".repeat(10));
        let snippet = content_snippet(&content, "alpha beta", 150, 40);
        assert_eq!(snippet, content);

        let late = format!("{}alpha{}beta", "z".repeat(200), "z".repeat(10));
        let snippet = content_snippet(&late, "beta alpha", 20, 5);
        assert_eq!(snippet, format!("...zzzzzalpha{}...", "z".repeat(10)));
    }

    #[test]
    fn test_snippet_without_match() {
        let content = "w".repeat(200);
        let snippet = content_snippet(&content, "missing", 150, 40);
        assert_eq!(snippet, format!("{}...", "w".repeat(150)));

        assert_eq!(content_snippet("short", "missing", 150, 40), "short");
        assert_eq!(content_snippet("short", "a", 150, 40), "short");
        assert_eq!(content_snippet("", "short", 150, 40), "");
    }

    #[test]
    fn test_snippet_counts_characters() {
        let content = format!("{}ünïcode match", "é".repeat(60));
        let snippet = content_snippet(&content, "match", 30, 10);
        assert!(snippet.starts_with("..."));
        assert!(snippet.contains("match"));
    }
}

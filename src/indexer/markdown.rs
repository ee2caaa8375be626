//! Markdown to searchable text
//!
//! Front matter splitting, the body normalization pipeline, and heading
//! extraction. Every step is a pure string transform so it can be tested
//! on its own.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// Front matter keys the index cares about. Everything else is ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Split `---` delimited YAML front matter from the body.
///
/// Files without front matter return defaults and the whole input as body.
/// Unparseable YAML is logged and treated as empty.
pub fn split_front_matter(source: &str) -> (FrontMatter, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let Some(rest) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return (FrontMatter::default(), source);
    };

    // closing delimiter on its own line, possibly with an empty block
    let (yaml, body) = if let Some(body) = rest.strip_prefix("---") {
        ("", body)
    } else {
        match rest.find("\n---") {
            Some(end) => (&rest[..end], &rest[end + 4..]),
            None => return (FrontMatter::default(), source),
        }
    };
    let body = body.trim_start_matches(|c: char| c == '-' || c == '\r');
    let body = body.strip_prefix('\n').unwrap_or(body);

    if yaml.trim().is_empty() {
        return (FrontMatter::default(), body);
    }

    match serde_yaml::from_str::<FrontMatter>(yaml) {
        Ok(front) => (front, body),
        Err(e) => {
            tracing::warn!("Ignoring malformed front matter: {}", e);
            (FrontMatter::default(), body)
        }
    }
}

struct Patterns {
    fenced_code: Regex,
    inline_code: Regex,
    link: Regex,
    heading_marker: Regex,
    emphasis: Regex,
    blockquote: Regex,
    table_cell: Regex,
    rule: Regex,
    whitespace: Regex,
    heading_line: Regex,
    heading_noise: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        fenced_code: Regex::new(r"```[\s\S]*?```").unwrap(),
        inline_code: Regex::new(r"`([^`]+)`").unwrap(),
        link: Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap(),
        heading_marker: Regex::new(r"#{1,6}\s*").unwrap(),
        emphasis: Regex::new(r"[*_~]").unwrap(),
        blockquote: Regex::new(r">\s*").unwrap(),
        table_cell: Regex::new(r"\|[^|]+\|").unwrap(),
        rule: Regex::new(r"-{3,}").unwrap(),
        whitespace: Regex::new(r"\s+").unwrap(),
        heading_line: Regex::new(r"(?m)^#{1,6}[ \t]+(.+?)[ \t]*$").unwrap(),
        heading_noise: Regex::new(r"[*_`]").unwrap(),
    })
}

/// Run the body through the normalization pipeline and cap it to
/// `max_chars` characters.
pub fn normalize(body: &str, max_chars: usize) -> String {
    let p = patterns();

    let text = p.fenced_code.replace_all(body, " ");
    let text = p.inline_code.replace_all(&text, "$1");
    let text = p.link.replace_all(&text, "$1");
    let text = p.heading_marker.replace_all(&text, "");
    let text = p.emphasis.replace_all(&text, "");
    let text = p.blockquote.replace_all(&text, "");
    let text = p.table_cell.replace_all(&text, " ");
    let text = p.rule.replace_all(&text, " ");
    let text = p.whitespace.replace_all(&text, " ");

    truncate_chars(text.trim(), max_chars).to_string()
}

/// Collect heading texts from the raw body, in order, space-joined.
/// Lines inside fenced code blocks are not headings.
pub fn extract_headings(body: &str) -> String {
    let p = patterns();
    let without_code = p.fenced_code.replace_all(body, "\n");

    p.heading_line
        .captures_iter(&without_code)
        .map(|caps| p.heading_noise.replace_all(&caps[1], "").trim().to_string())
        .filter(|h| !h.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Longest prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_matter() {
        let src = "---\ntitle: Scheduler\ndescription: \"How nodes run\"\ntags: [a, b]\n---\n# Body\n";
        let (front, body) = split_front_matter(src);
        assert_eq!(front.title.as_deref(), Some("Scheduler"));
        assert_eq!(front.description.as_deref(), Some("How nodes run"));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_no_front_matter() {
        let (front, body) = split_front_matter("# Just a page\n");
        assert!(front.title.is_none());
        assert_eq!(body, "# Just a page\n");
    }

    #[test]
    fn test_malformed_front_matter_is_ignored() {
        let (front, body) = split_front_matter("---\ntitle: [unclosed\n---\ntext");
        assert!(front.title.is_none());
        assert_eq!(body, "text");
    }

    #[test]
    fn test_normalize_pipeline() {
        let body = "# Title\n\nSome **bold** and _it_ text with a [link](https://x.y).\n\n\
                    ```rust\nfn hidden() {}\n```\n\n> quoted `code`\n\n---\n\nend";
        let text = normalize(body, 2000);
        assert_eq!(
            text,
            "Title Some bold and it text with a link. quoted code end"
        );
        assert!(!text.contains("hidden"));
    }

    #[test]
    fn test_normalize_tables() {
        let text = normalize("| a | b |\n|---|---|\nafter", 2000);
        assert!(!text.contains('|'));
        assert!(text.ends_with("after"));
    }

    #[test]
    fn test_normalize_caps_length() {
        let body = "word ".repeat(1000);
        let text = normalize(&body, 2000);
        assert_eq!(text.chars().count(), 2000);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_extract_headings() {
        let body = "# Scheduler\ntext\n## The `tick` **loop**\n```\n# not a heading\n```\n###### Deep";
        assert_eq!(extract_headings(body), "Scheduler The tick loop Deep");
    }
}

//! Read-only extraction of page attributes from Markdown text.

use std::sync::LazyLock;

use regex::Regex;

use docatlas_shared::ContentLevel;

/// Only the top of a page is searched for its content-level marker.
pub const CONTENT_LEVEL_SCAN_LINES: usize = 30;

/// Extract the text of the first H1 heading, if any.
///
/// The `#` must be followed by a space or tab on the same line.
pub fn first_h1(md: &str) -> Option<String> {
    static H1_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^#[ \t]+(.+)$").expect("valid regex")
    });

    H1_RE
        .captures(md)
        .map(|c| c[1].trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Detect the content level declared near the top of a page.
///
/// Marker forms are tried in order and the first that matches wins:
/// `**Content Level: N**`, `content-level: N`, `Content Level: N`, `level: N`.
/// A winning marker whose number does not fit a `u64` yields `None`; weaker
/// forms are not consulted.
pub fn content_level(md: &str) -> Option<ContentLevel> {
    static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        [
            r"(?i)\*\*\s*Content\s*Level\s*:\s*(\d+)\s*\*\*",
            r"(?i)content-level\s*:\s*(\d+)",
            r"(?i)Content\s*Level\s*:\s*(\d+)",
            r"(?i)level\s*:?\s*(\d+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    });

    let head = head_lines(md, CONTENT_LEVEL_SCAN_LINES);

    let caps = PATTERNS.iter().find_map(|re| re.captures(head))?;
    caps[1].parse::<u64>().ok().map(ContentLevel)
}

/// Slice of `md` covering at most the first `n` lines.
fn head_lines(md: &str, n: usize) -> &str {
    match md.match_indices('\n').nth(n.saturating_sub(1)) {
        Some((idx, _)) if n > 0 => &md[..=idx],
        _ if n == 0 => "",
        _ => md,
    }
}

//! Copyright header enforcement.
//!
//! A page's header is the leading HTML comment whose body starts with
//! `Copyright`. It must match the configured notice (modulo whitespace) and
//! sit directly above the first H1.

use std::sync::LazyLock;

use regex::Regex;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\A\s*(<!--\s*Copyright.*?-->)\s*").expect("valid regex")
});

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Return the page with `notice` as its header, and whether anything changed.
pub fn apply_notice(md: &str, notice: &str) -> (String, bool) {
    let body = match HEADER_RE.captures(md) {
        Some(caps) => {
            if normalize_ws(&caps[1]) == normalize_ws(notice) {
                return (md.to_string(), false);
            }
            &md[caps.get(0).map_or(0, |m| m.end())..]
        }
        None => md,
    };

    (insert_before_h1(body, notice), true)
}

fn insert_before_h1(md: &str, notice: &str) -> String {
    static H1_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^#[ \t]+.+$").expect("valid regex")
    });

    let Some(h1) = H1_RE.find(md) else {
        return format!("{notice}\n\n{md}");
    };

    let before = md[..h1.start()].trim_end();
    let from_h1 = &md[h1.start()..];

    if before.is_empty() {
        format!("{notice}\n\n{from_h1}")
    } else {
        format!("{notice}\n\n{before}\n\n{from_h1}")
    }
}

fn normalize_ws(s: &str) -> String {
    WS_RE.replace_all(s.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docatlas_shared::DEFAULT_COPYRIGHT_NOTICE as NOTICE;

    fn existing_notice(md: &str) -> Option<&str> {
        HEADER_RE
            .captures(md)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
    }

    #[test]
    fn adds_header_to_bare_page() {
        let (out, changed) = apply_notice("# Title\n\nBody\n", NOTICE);
        assert!(changed);
        assert_eq!(out, format!("{NOTICE}\n\n# Title\n\nBody\n"));
    }

    #[test]
    fn adds_header_when_no_h1() {
        let (out, changed) = apply_notice("Just text.\n", NOTICE);
        assert!(changed);
        assert_eq!(out, format!("{NOTICE}\n\nJust text.\n"));
    }

    #[test]
    fn keeps_preamble_between_header_and_h1() {
        let (out, changed) = apply_notice("[TOC]\n\n\n# Title\nBody", NOTICE);
        assert!(changed);
        assert_eq!(out, format!("{NOTICE}\n\n[TOC]\n\n# Title\nBody"));
    }

    #[test]
    fn matching_header_left_alone_even_with_different_spacing() {
        let page = "<!--\n  Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.\n  SPDX-License-Identifier: CC-BY-SA-4.0\n-->\n\n# Title\n";
        let (out, changed) = apply_notice(page, NOTICE);
        assert!(!changed);
        assert_eq!(out, page);
    }

    #[test]
    fn outdated_header_replaced() {
        let page = "<!-- Copyright 2020 Someone Else -->\n\n# Title\n\nBody";
        let (out, changed) = apply_notice(page, NOTICE);
        assert!(changed);
        assert_eq!(out, format!("{NOTICE}\n\n# Title\n\nBody"));
        assert_eq!(existing_notice(&out), Some(NOTICE.trim()));
    }

    #[test]
    fn unrelated_leading_comment_is_not_a_header() {
        let page = "<!-- draft -->\n# Title\n";
        assert_eq!(existing_notice(page), None);
        let (out, changed) = apply_notice(page, NOTICE);
        assert!(changed);
        assert_eq!(out, format!("{NOTICE}\n\n<!-- draft -->\n\n# Title\n"));
    }

    #[test]
    fn second_application_is_a_no_op() {
        let (once, _) = apply_notice("# Title\n", NOTICE);
        let (twice, changed) = apply_notice(&once, NOTICE);
        assert!(!changed);
        assert_eq!(once, twice);
    }
}

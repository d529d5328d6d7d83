//! Anchor checks for a single HTML document.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use scraper::{Html, Selector};

static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

pub(crate) const MISSING_TARGET: &str = r#"External link missing target="_blank""#;
pub(crate) const MISSING_REL: &str = r#"External link missing rel="noopener noreferrer""#;

/// Severity of a lint finding. Errors sort before warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintLevel {
    Error,
    Warning,
}

impl LintLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
        }
    }
}

impl std::fmt::Display for LintLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found on one anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub file: PathBuf,
    pub href: String,
    pub message: &'static str,
    pub level: LintLevel,
}

/// Check every external anchor in `html`.
///
/// An anchor is external when its `href` starts with `http://` or
/// `https://`. It must carry `target="_blank"` (warning otherwise) and a
/// `rel` naming both `noopener` and `noreferrer` (error otherwise).
pub fn lint_html(html: &str, file: &Path) -> Vec<LintIssue> {
    let doc = Html::parse_document(html);
    let mut issues = Vec::new();

    for anchor in doc.select(&ANCHOR_SEL) {
        let el = anchor.value();
        let Some(href) = el.attr("href") else {
            continue;
        };
        if !(href.starts_with("http://") || href.starts_with("https://")) {
            continue;
        }

        let issue = |message, level| LintIssue {
            file: file.to_path_buf(),
            href: href.to_string(),
            message,
            level,
        };

        if el.attr("target") != Some("_blank") {
            issues.push(issue(MISSING_TARGET, LintLevel::Warning));
        }

        let rel = el.attr("rel").unwrap_or_default();
        let has = |token: &str| {
            rel.split_ascii_whitespace()
                .any(|r| r.eq_ignore_ascii_case(token))
        };
        if !(has("noopener") && has("noreferrer")) {
            issues.push(issue(MISSING_REL, LintLevel::Error));
        }
    }

    issues
}

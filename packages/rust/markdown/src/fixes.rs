//! Style-guide reformatters for Markdown pages.
//!
//! Each fix is a function `&str -> Rewrite`. A fix never fails: text it does
//! not recognise is returned unchanged.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use docatlas_shared::ContentLevel;

/// Output of a single fix applied to one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The rewritten page.
    pub content: String,
    /// Style problems noticed but not corrected.
    pub warnings: Vec<String>,
}

impl Rewrite {
    fn clean(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }
}

/// The available reformatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fix {
    /// Normalize content-level markers to `**Content Level: N**`.
    ContentLevel,
    /// Normalize "suggested pre-reading" markers to an H2.
    Prereading,
    /// Normalize "TL;DR" markers to an H2.
    Tldr,
    /// Replace Markdown image syntax with a centered, fixed-width `<img>`.
    Images,
}

impl Fix {
    /// Apply this fix to a page.
    pub fn apply(self, md: &str) -> Rewrite {
        match self {
            Fix::ContentLevel => normalize_content_level(md),
            Fix::Prereading => Rewrite::clean(normalize_prereading(md)),
            Fix::Tldr => Rewrite::clean(normalize_tldr(md)),
            Fix::Images => Rewrite::clean(center_images(md)),
        }
    }

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Fix::ContentLevel => "content-level",
            Fix::Prereading => "prereading",
            Fix::Tldr => "tldr",
            Fix::Images => "images",
        }
    }
}

// ---------------------------------------------------------------------------
// Content level
// ---------------------------------------------------------------------------

/// Rewrite every content-level marker as `**Content Level: N**` on its own
/// paragraph and flag values outside 100/200/300/400.
///
/// Multi-level markers such as `200/300` are kept as written. Surrounding
/// blank lines are absorbed so an already normalized page is left unchanged.
fn normalize_content_level(md: &str) -> Rewrite {
    static LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"(?i)\s*[#\-]*[ \t]*\*{0,2}content[-\s]?level:?\s*(\d+(?:/\d+)*)\*{0,2}[ \t]*(?:\r?\n)*",
        )
        .expect("valid regex")
    });

    let mut warnings = Vec::new();

    let content = LEVEL_RE
        .replace_all(md, |caps: &Captures| {
            let levels = &caps[1];
            let non_standard: Vec<&str> = levels
                .split('/')
                .filter(|n| {
                    !n.trim()
                        .parse::<u64>()
                        .map(|v| ContentLevel(v).is_standard())
                        .unwrap_or(false)
                })
                .collect();

            if !non_standard.is_empty() {
                warnings.push(format!(
                    "non-standard content level(s) {} in '{levels}' (expected 100, 200, 300, 400)",
                    non_standard.join(", ")
                ));
            }

            format!("\n\n**Content Level: {levels}**\n\n")
        })
        .into_owned();

    Rewrite { content, warnings }
}

// ---------------------------------------------------------------------------
// Suggested pre-reading
// ---------------------------------------------------------------------------

const PREREADING_HEADING: &str = "## Suggested Pre-Reading";

/// Turn any standalone "Suggested Pre-Reading" marker line into an H2
/// followed by exactly one blank line.
fn normalize_prereading(md: &str) -> String {
    static MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        const BODY: &str = r"suggested[ \t]+(?:pre-reading|prereading):?[ \t]*";
        [
            // H1-H4
            format!(r"(?im)^#{{1,4}}[ \t]*{BODY}$"),
            // bold
            format!(r"(?im)^\*\*[ \t]*{BODY}\*\*[ \t]*$"),
            format!(r"(?im)^__[ \t]*{BODY}__[ \t]*$"),
            // italic
            format!(r"(?im)^\*[ \t]*{BODY}\*[ \t]*$"),
            format!(r"(?im)^_[ \t]*{BODY}_[ \t]*$"),
            // plain
            format!(r"(?im)^{BODY}$"),
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    });
    static SPACING_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^## Suggested Pre-Reading[ \t]*(?:\r?\n)+").expect("valid regex")
    });

    let mut result = md.to_string();
    for re in MARKERS.iter() {
        result = re.replace_all(&result, PREREADING_HEADING).into_owned();
    }

    SPACING_RE
        .replace_all(&result, format!("{PREREADING_HEADING}\n\n"))
        .into_owned()
}

// ---------------------------------------------------------------------------
// TL;DR
// ---------------------------------------------------------------------------

/// Turn every TL;DR marker (bold, H1-H3, or bare) into `## TL;DR` and a blank line.
fn normalize_tldr(md: &str) -> String {
    static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\*\*\s*tl;dr:?\s*\*\*").expect("valid regex")
    });
    static H3_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)###\s*tl;dr:?\s*").expect("valid regex")
    });
    static ANY_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)(?:##?\s*)?tl;dr:?\s*").expect("valid regex")
    });

    let flattened = BOLD_RE.replace_all(md, "TL;DR:");
    let flattened = H3_RE.replace_all(&flattened, "TL;DR:");

    ANY_RE.replace_all(&flattened, "## TL;DR\n\n").into_owned()
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Replace `![alt](src)` with a centered 800px-wide `<img>`.
fn center_images(md: &str) -> String {
    static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("valid regex")
    });

    IMAGE_RE
        .replace_all(md, |caps: &Captures| {
            format!(
                r#"<div style="margin:auto;text-align:center;width:100%;"><img src="{}" alt="{}" width="800"/></div>"#,
                &caps[2], &caps[1]
            )
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_level_heading_form_normalized() {
        let input = "# Title\n### Content-Level: 200\nBody";
        let out = Fix::ContentLevel.apply(input);
        assert_eq!(out.content, "# Title\n\n**Content Level: 200**\n\nBody");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn content_level_keeps_multi_level_and_flags_odd_values() {
        let input = "content level 100/250\n";
        let out = Fix::ContentLevel.apply(input);
        assert!(out.content.contains("**Content Level: 100/250**"));
        assert_eq!(out.warnings.len(), 1);
        assert!(
            out.warnings[0].starts_with("non-standard content level(s) 250 in '100/250'"),
            "{}",
            out.warnings[0]
        );
    }

    #[test]
    fn content_level_is_stable_on_normalized_text() {
        let input = "# Title\n\n**Content Level: 300**\n\nBody";
        let out = Fix::ContentLevel.apply(input);
        assert_eq!(out.content, input);
    }

    #[test]
    fn prereading_variants_become_h2() {
        for marker in [
            "### Suggested Pre-Reading:",
            "**Suggested Prereading**",
            "__suggested pre-reading:__",
            "*Suggested Pre-Reading*",
            "_suggested prereading_",
            "Suggested Pre-Reading",
        ] {
            let input = format!("# T\n\n{marker}\n- [Link](a.md)\n");
            let out = Fix::Prereading.apply(&input).content;
            assert_eq!(
                out, "# T\n\n## Suggested Pre-Reading\n\n- [Link](a.md)\n",
                "marker {marker:?}"
            );
        }
    }

    #[test]
    fn prereading_leaves_longer_headings_alone() {
        let input = "## Suggested Pre-Reading Materials\n- a\n";
        assert_eq!(Fix::Prereading.apply(input).content, input);
    }

    #[test]
    fn prereading_spacing_collapses_to_one_blank_line() {
        let input = "## Suggested Pre-Reading  \n\n\n- a\n";
        assert_eq!(
            Fix::Prereading.apply(input).content,
            "## Suggested Pre-Reading\n\n- a\n"
        );
    }

    #[test]
    fn prereading_leaves_inline_mentions() {
        let input = "See the suggested pre-reading below for details.\n";
        assert_eq!(Fix::Prereading.apply(input).content, input);
    }

    #[test]
    fn tldr_forms_become_h2() {
        assert_eq!(
            Fix::Tldr.apply("**TL;DR:** Short summary.").content,
            "## TL;DR\n\nShort summary."
        );
        assert_eq!(
            Fix::Tldr.apply("### TL;DR\nShort summary.").content,
            "## TL;DR\n\nShort summary."
        );
        assert_eq!(
            Fix::Tldr.apply("tl;dr: Short summary.").content,
            "## TL;DR\n\nShort summary."
        );
    }

    #[test]
    fn tldr_is_stable_on_normalized_text() {
        let input = "## TL;DR\n\nShort summary.";
        assert_eq!(Fix::Tldr.apply(input).content, input);
    }

    #[test]
    fn images_are_centered() {
        let input = "Before ![Architecture diagram](assets/arch.png) after";
        let out = Fix::Images.apply(input).content;
        assert_eq!(
            out,
            r#"Before <div style="margin:auto;text-align:center;width:100%;"><img src="assets/arch.png" alt="Architecture diagram" width="800"/></div> after"#
        );
    }

    #[test]
    fn plain_links_are_not_images() {
        let input = "[Not an image](page.md)";
        assert_eq!(Fix::Images.apply(input).content, input);
    }
}

//! Lints generated HTML for external links that open in the same tab or
//! leak the opener.

mod anchors;
mod report;

pub use anchors::{LintIssue, LintLevel, lint_html};
pub use report::{LintReport, lint_directory};

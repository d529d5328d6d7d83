//! Directory-wide lint run and its textual report.

use std::fmt;
use std::path::Path;

use tracing::{debug, instrument, warn};

use docatlas_shared::{Result, collect_files, require_dir};

use crate::anchors::{LintIssue, LintLevel, lint_html};

const HTML_EXTENSIONS: &[&str] = &["html", "htm"];
const RULE_WIDTH: usize = 50;

/// Aggregate result of linting a directory tree.
#[derive(Debug, Default)]
pub struct LintReport {
    pub files_processed: usize,
    pub files_with_issues: usize,
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.level == LintLevel::Error)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.level == LintLevel::Error)
            .count()
    }
}

impl fmt::Display for LintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "HTML Anchor Lint Report")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Files processed: {}", self.files_processed)?;
        writeln!(f, "Files with issues: {}", self.files_with_issues)?;
        writeln!(f, "Total issues found: {}", self.issues.len())?;
        write!(f, "{rule}")?;

        let mut sorted: Vec<&LintIssue> = self.issues.iter().collect();
        sorted.sort_by(|a, b| a.file.cmp(&b.file).then(a.level.cmp(&b.level)));

        let mut current: Option<&Path> = None;
        for issue in sorted {
            if current != Some(issue.file.as_path()) {
                current = Some(issue.file.as_path());
                write!(f, "\n\n{}:", issue.file.display())?;
            }
            write!(f, "\n  [{}] {}", issue.level, issue.message)?;
            write!(f, "\n    at href: {}", issue.href)?;
        }
        Ok(())
    }
}

/// Lint every `.html`/`.htm` file under `dir`.
///
/// Files that cannot be read are logged and left out of the counts.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn lint_directory(dir: &Path) -> Result<LintReport> {
    require_dir(dir)?;

    let mut report = LintReport::default();
    for file in collect_files(dir, HTML_EXTENSIONS, true) {
        let html = match std::fs::read_to_string(&file) {
            Ok(html) => html,
            Err(e) => {
                warn!(path = %file.display(), error = %e, "cannot read file");
                continue;
            }
        };

        report.files_processed += 1;
        let issues = lint_html(&html, &file);
        if !issues.is_empty() {
            debug!(path = %file.display(), count = issues.len(), "anchor issues");
            report.files_with_issues += 1;
            report.issues.extend(issues);
        }
    }

    Ok(report)
}

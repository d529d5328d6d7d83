//! In-place rewriting of Markdown files across a directory tree.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use docatlas_shared::{
    CopyrightConfig, DocAtlasError, Result, collect_files, has_extension, require_dir,
};

use crate::copyright;
use crate::fixes::{Fix, Rewrite};

/// Extensions treated as Markdown by the rewriters.
const MARKDOWN_EXTENSIONS: &[&str] = &["md"];

/// Counts from one rewriting pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Markdown files found.
    pub total: usize,
    /// Files whose content changed and was written back.
    pub updated: usize,
    /// Files that could not be read or written.
    pub failed: usize,
    /// Style warnings raised across all files.
    pub warnings: usize,
}

/// Apply `fix` to every Markdown file under `dir`.
#[instrument(skip_all, fields(fix = fix.name(), dir = %dir.display()))]
pub fn run_fix(fix: Fix, dir: &Path) -> Result<BatchSummary> {
    require_dir(dir)?;
    let files = collect_files(dir, MARKDOWN_EXTENSIONS, true);
    info!(count = files.len(), "rewriting markdown files");

    Ok(rewrite_files(&files, |_, md| fix.apply(md)))
}

/// Enforce the configured copyright header on a single Markdown file or on
/// every Markdown file under a directory.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn enforce_copyright(path: &Path, config: &CopyrightConfig) -> Result<BatchSummary> {
    let files = markdown_targets(path)?;
    info!(count = files.len(), "checking copyright headers");

    Ok(rewrite_files(&files, |file, md| {
        let (content, changed) = copyright::apply_notice(md, &config.notice);
        if !changed {
            debug!(path = %file.display(), "copyright already correct");
        }
        Rewrite {
            content,
            warnings: Vec::new(),
        }
    }))
}

/// Resolve a file-or-directory argument to the Markdown files it names.
pub fn markdown_targets(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(DocAtlasError::config(format!(
            "path '{}' does not exist",
            path.display()
        )));
    }

    if path.is_file() && has_extension(path, MARKDOWN_EXTENSIONS, true) {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        return Ok(collect_files(path, MARKDOWN_EXTENSIONS, true));
    }

    Err(DocAtlasError::config(format!(
        "'{}' is not a markdown file or directory",
        path.display()
    )))
}

/// Read, rewrite, and write back each file whose content changes.
///
/// Per-file failures are logged and counted; they never stop the pass.
fn rewrite_files<F>(files: &[PathBuf], mut rewrite: F) -> BatchSummary
where
    F: FnMut(&Path, &str) -> Rewrite,
{
    let mut summary = BatchSummary {
        total: files.len(),
        ..BatchSummary::default()
    };

    for file in files {
        let original = match std::fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %file.display(), error = %e, "could not read file");
                summary.failed += 1;
                continue;
            }
        };

        let out = rewrite(file, &original);
        for w in &out.warnings {
            warn!(path = %file.display(), "{w}");
        }
        summary.warnings += out.warnings.len();

        if out.content == original {
            continue;
        }

        if let Err(e) = std::fs::write(file, &out.content) {
            warn!(path = %file.display(), error = %e, "could not write file");
            summary.failed += 1;
            continue;
        }

        info!(path = %file.display(), "processed");
        summary.updated += 1;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("da-batch-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn run_fix_rewrites_only_changed_files() {
        let tmp = temp_dir();
        std::fs::create_dir_all(tmp.join("guide")).unwrap();
        std::fs::write(tmp.join("guide/a.md"), "**TL;DR:** Short.").unwrap();
        std::fs::write(tmp.join("b.MD"), "## TL;DR\n\nAlready fine.").unwrap();
        std::fs::write(tmp.join("notes.txt"), "**TL;DR:** untouched").unwrap();

        let summary = run_fix(Fix::Tldr, &tmp).unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.failed, 0);

        let a = std::fs::read_to_string(tmp.join("guide/a.md")).unwrap();
        assert_eq!(a, "## TL;DR\n\nShort.");
        let notes = std::fs::read_to_string(tmp.join("notes.txt")).unwrap();
        assert_eq!(notes, "**TL;DR:** untouched");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn run_fix_counts_level_warnings() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("a.md"), "# A\ncontent-level: 250\n").unwrap();

        let summary = run_fix(Fix::ContentLevel, &tmp).unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.warnings, 1);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn run_fix_rejects_missing_directory() {
        let tmp = temp_dir();
        let err = run_fix(Fix::Images, &tmp.join("nope")).unwrap_err();
        assert!(err.is_config());
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn enforce_copyright_on_single_file_and_tree() {
        let tmp = temp_dir();
        let config = CopyrightConfig::default();
        std::fs::write(tmp.join("one.md"), "# One\n").unwrap();
        std::fs::write(tmp.join("two.md"), "# Two\n").unwrap();

        let single = enforce_copyright(&tmp.join("one.md"), &config).unwrap();
        assert_eq!(single.total, 1);
        assert_eq!(single.updated, 1);

        let tree = enforce_copyright(&tmp, &config).unwrap();
        assert_eq!(tree.total, 2);
        assert_eq!(tree.updated, 1);

        let one = std::fs::read_to_string(tmp.join("one.md")).unwrap();
        assert!(one.starts_with(&config.notice));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn markdown_targets_rejects_other_files() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("page.html"), "<p>").unwrap();

        assert!(markdown_targets(&tmp.join("page.html")).unwrap_err().is_config());
        assert!(markdown_targets(&tmp.join("missing.md")).unwrap_err().is_config());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}

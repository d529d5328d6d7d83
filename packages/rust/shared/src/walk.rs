//! Corpus traversal.
//!
//! Every tool walks a directory tree and picks files by extension; entries
//! come back in file-name order so runs over an unchanged tree are stable.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{DocAtlasError, Result};

/// Fail with a config error unless `path` is an existing directory.
pub fn require_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(DocAtlasError::config(format!(
            "{} is not a valid directory",
            path.display()
        )))
    }
}

/// True if `path` ends in one of `extensions` (given without the dot).
pub fn has_extension(path: &Path, extensions: &[&str], ignore_case: bool) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };

    extensions.iter().any(|wanted| {
        if ignore_case {
            ext.eq_ignore_ascii_case(wanted)
        } else {
            ext == *wanted
        }
    })
}

/// Collect all files under `root` whose extension is in `extensions`.
///
/// Unreadable entries are logged and skipped.
pub fn collect_files(root: &Path, extensions: &[&str], ignore_case: bool) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extensions, ignore_case))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

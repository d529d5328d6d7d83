//! Last-modified lookup for source pages.
//!
//! The consolidator asks a [`RevisionHistory`] first and falls back to a
//! [`Clock`]. Both are traits so tests can pin them.

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, Utc};
use tracing::debug;

/// Version-control query: when was this file last changed?
pub trait RevisionHistory {
    /// Timestamp of the most recent revision touching `path`, or `None` when
    /// the file is untracked or not under version control.
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>>;
}

/// Wall-clock source for the fallback timestamp.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// History that never knows anything; every page gets the clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl RevisionHistory for NoHistory {
    fn last_modified(&self, _path: &Path) -> Option<DateTime<Utc>> {
        None
    }
}

/// Author time of the latest commit touching the file, via the `git` CLI.
///
/// Runs `git log -1 --format=%at -- <file>` from the file's own directory,
/// so any enclosing repository is found.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHistory;

impl RevisionHistory for GitHistory {
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        let file_name = path.file_name()?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let output = match Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["log", "-1", "--format=%at", "--"])
            .arg(file_name)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "git not available");
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                path = %path.display(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "no git history"
            );
            return None;
        }

        parse_epoch(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse `git log --format=%at` output; empty output means untracked.
fn parse_epoch(text: &str) -> Option<DateTime<Utc>> {
    let secs: i64 = text.trim().parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}

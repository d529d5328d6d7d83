//! Output file naming: numeric prefixes, title sanitising, and per-run dedup.

use std::collections::HashSet;
use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

/// Dot-joined section number derived from ancestor directory names (`2.1.3`).
///
/// Always has at least two components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericPrefix(Vec<String>);

impl std::fmt::Display for NumericPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Derive the numeric prefix for a file living in `dir` under corpus `root`.
///
/// Directories are visited from the root down. A name like `2_1_prompting`
/// carries a full section number and replaces the running prefix; a name
/// like `03_setup` carries one group and extends it. The walk stops at the
/// first directory whose section number is shorter than the best so far.
/// Names without leading digits are skipped.
pub fn numeric_prefix(root: &Path, dir: &Path) -> Option<NumericPrefix> {
    let rel = dir.strip_prefix(root).ok()?;
    let mut best: Vec<String> = Vec::new();

    for component in rel.components() {
        let Component::Normal(name) = component else {
            continue;
        };

        let groups = numeral_groups(&name.to_string_lossy());
        if groups.is_empty() {
            continue;
        }

        let candidate = if groups.len() >= 2 {
            groups
        } else {
            let mut extended = best.clone();
            extended.extend(groups);
            extended
        };

        if candidate.len() >= best.len() {
            best = candidate;
        } else {
            break;
        }
    }

    (best.len() >= 2).then_some(NumericPrefix(best))
}

/// Leading digit runs of a directory name, separated by `_` or `-`.
fn numeral_groups(name: &str) -> Vec<String> {
    static LEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^\d+(?:[_-]\d+)*").expect("valid regex")
    });

    LEAD_RE
        .find(name)
        .map(|m| {
            m.as_str()
                .split(['_', '-'])
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Replace every character outside `[A-Za-z0-9]` with `_`.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// First 8 hex characters of the SHA-256 of a directory path.
pub fn dir_hash(dir: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(dir.to_string_lossy().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..8].to_string()
}

/// Output base name (no extension) for a page.
pub fn base_name(prefix: Option<&NumericPrefix>, dir: &Path, title: &str) -> String {
    let sanitized = sanitize_title(title);
    match prefix {
        Some(p) => format!("{p}_{sanitized}"),
        None => format!("{}_{sanitized}", dir_hash(dir)),
    }
}

/// Base names already handed out during one run.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `base`, or the first free `base_1`, `base_2`, ... if taken.
    ///
    /// Nothing is reserved until [`reserve`](Self::reserve) is called.
    pub fn available(&self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut counter = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }
        candidate
    }

    /// Mark `name` as taken for the rest of the run.
    pub fn reserve(&mut self, name: String) {
        self.used.insert(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(root: &str, dir: &str) -> Option<String> {
        numeric_prefix(Path::new(root), Path::new(dir)).map(|p| p.to_string())
    }

    #[test]
    fn single_groups_chain_across_directories() {
        assert_eq!(prefix("root", "root/02-intro/03_setup").as_deref(), Some("02.03"));
    }

    #[test]
    fn no_numbered_directories_means_no_prefix() {
        assert_eq!(prefix("root", "root/notes"), None);
        assert_eq!(prefix("root", "root"), None);
    }

    #[test]
    fn single_group_alone_is_not_enough() {
        assert_eq!(prefix("root", "root/02-intro"), None);
        assert_eq!(prefix("root", "root/02-intro/notes"), None);
    }

    #[test]
    fn deepest_full_section_number_wins() {
        assert_eq!(
            prefix(
                "docs",
                "docs/topics/2_0_foundations/2_1_key_primitives/2_1_1_prompt"
            )
            .as_deref(),
            Some("2.1.1")
        );
    }

    #[test]
    fn shorter_section_number_stops_the_walk() {
        assert_eq!(
            prefix("docs", "docs/2_1_1_prompt/3_0_other/3_1_deeper").as_deref(),
            Some("2.1.1")
        );
    }

    #[test]
    fn equal_length_section_number_replaces() {
        assert_eq!(prefix("docs", "docs/1_2_a/1_3_b").as_deref(), Some("1.3"));
    }

    #[test]
    fn unnumbered_directories_do_not_break_the_chain() {
        assert_eq!(prefix("r", "r/02-intro/misc/03_setup").as_deref(), Some("02.03"));
    }

    #[test]
    fn numeral_groups_parsing() {
        assert_eq!(numeral_groups("2_1_3_rag"), vec!["2", "1", "3"]);
        assert_eq!(numeral_groups("02-03-x"), vec!["02", "03"]);
        assert_eq!(numeral_groups("04-"), vec!["04"]);
        assert!(numeral_groups("v2_notes").is_empty());
    }

    #[test]
    fn sanitize_replaces_non_alphanumerics() {
        assert_eq!(sanitize_title("RAG: What & Why?"), "RAG__What___Why_");
        assert_eq!(sanitize_title("Café 2"), "Caf__2");
    }

    #[test]
    fn dir_hash_is_short_and_stable() {
        let a = dir_hash(Path::new("docs/notes"));
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, dir_hash(Path::new("docs/notes")));
        assert_ne!(a, dir_hash(Path::new("docs/other")));
    }

    #[test]
    fn base_name_uses_prefix_or_hash() {
        let p = numeric_prefix(Path::new("r"), Path::new("r/1_2_x")).unwrap();
        assert_eq!(base_name(Some(&p), Path::new("r/1_2_x"), "Key Ideas"), "1.2_Key_Ideas");

        let hashed = base_name(None, Path::new("r/notes"), "Key Ideas");
        assert_eq!(hashed, format!("{}_Key_Ideas", dir_hash(Path::new("r/notes"))));
    }

    #[test]
    fn registry_appends_counters() {
        let mut names = NameRegistry::new();
        for expected in ["base", "base_1", "base_2"] {
            let name = names.available("base");
            assert_eq!(name, expected);
            names.reserve(name);
        }
        assert_eq!(names.available("base_1"), "base_1_1");
    }

    #[test]
    fn registry_only_counts_reserved_names() {
        let mut names = NameRegistry::new();
        assert_eq!(names.available("page"), "page");
        assert_eq!(names.available("page"), "page");
        names.reserve("page".into());
        assert_eq!(names.available("page"), "page_1");
    }
}

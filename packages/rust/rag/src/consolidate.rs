//! End-to-end consolidation: source tree → staging directory → `rag.zip`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use docatlas_markdown::{content_level, first_h1};
use docatlas_shared::{
    ARCHIVE_FILE_NAME, DocAtlasError, RagConfig, RagMetadata, Result, collect_files, require_dir,
};

use crate::archive::write_archive;
use crate::history::{Clock, RevisionHistory};
use crate::metadata::{METADATA_SUFFIX, build_metadata, source_uri};
use crate::naming::{NameRegistry, base_name, numeric_prefix};

/// Only files with exactly this extension are consolidated.
const MARKDOWN_EXTENSION: &str = "md";

/// One consolidated page.
#[derive(Debug, Clone)]
pub struct OutputRecord {
    /// Original file.
    pub source: PathBuf,
    /// Byte-identical copy in the staging directory.
    pub staged_path: PathBuf,
    /// Sidecar next to the staged copy.
    pub metadata_path: PathBuf,
    /// Sidecar content.
    pub metadata: RagMetadata,
}

/// Result of a consolidation run.
#[derive(Debug)]
pub struct ConsolidateResult {
    /// Staging directory that was populated.
    pub staging_dir: PathBuf,
    /// Archive written to the destination directory.
    pub archive_path: PathBuf,
    /// Markdown files discovered.
    pub files_found: usize,
    /// Pages staged with their sidecars.
    pub records: Vec<OutputRecord>,
    /// Files skipped because of per-file errors.
    pub skipped: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl ConsolidateResult {
    /// Number of pages that made it into the archive.
    pub fn consolidated(&self) -> usize {
        self.records.len()
    }
}

/// Progress callback for reporting consolidation status.
pub trait ConsolidateProgress {
    /// Called once discovery has finished.
    fn discovered(&self, total: usize);
    /// Called after a page has been copied into staging.
    fn file_copied(&self, source: &Path, staged: &Path, current: usize, total: usize);
    /// Called after a sidecar has been written.
    fn metadata_written(&self, path: &Path);
    /// Called when the run completes.
    fn done(&self, result: &ConsolidateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ConsolidateProgress for SilentProgress {
    fn discovered(&self, _total: usize) {}
    fn file_copied(&self, _source: &Path, _staged: &Path, _current: usize, _total: usize) {}
    fn metadata_written(&self, _path: &Path) {}
    fn done(&self, _result: &ConsolidateResult) {}
}

/// Flattens a Markdown corpus into a staging directory with metadata sidecars
/// and archives it.
pub struct Consolidator<'a> {
    config: &'a RagConfig,
    history: &'a dyn RevisionHistory,
    clock: &'a dyn Clock,
}

impl<'a> Consolidator<'a> {
    pub fn new(
        config: &'a RagConfig,
        history: &'a dyn RevisionHistory,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            config,
            history,
            clock,
        }
    }

    /// Run the full consolidation.
    ///
    /// 1. Validate the source directory, create the destination
    /// 2. Empty the staging directory
    /// 3. Stage every Markdown file with its sidecar
    /// 4. Zip the staging directory into `<destination>/rag.zip`
    ///
    /// An invalid source is a config error and nothing is written. Per-file
    /// failures are logged and the file is left out.
    #[instrument(skip_all, fields(source = %source.display(), destination = %destination.display()))]
    pub fn run(
        &self,
        source: &Path,
        destination: &Path,
        progress: &dyn ConsolidateProgress,
    ) -> Result<ConsolidateResult> {
        let start = Instant::now();
        let staging_dir = &self.config.staging_dir;

        require_dir(source)?;
        guard_source(source, staging_dir)?;

        if !destination.exists() {
            info!(path = %destination.display(), "creating archive destination");
        }
        std::fs::create_dir_all(destination).map_err(|e| DocAtlasError::io(destination, e))?;

        reset_staging(staging_dir)?;

        let files = collect_files(source, &[MARKDOWN_EXTENSION], false);
        let total = files.len();
        progress.discovered(total);
        if files.is_empty() {
            info!("no markdown files found");
        } else {
            info!(count = total, "found markdown files");
        }

        let mut names = NameRegistry::new();
        let mut records = Vec::with_capacity(total);
        let mut skipped = 0;

        for file in &files {
            match self.stage_file(source, file, &mut names) {
                Ok(record) => {
                    progress.file_copied(&record.source, &record.staged_path, records.len() + 1, total);
                    progress.metadata_written(&record.metadata_path);
                    records.push(record);
                }
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "skipping file");
                    skipped += 1;
                }
            }
        }

        let archive_path = destination.join(ARCHIVE_FILE_NAME);
        write_archive(staging_dir, &archive_path)?;

        let result = ConsolidateResult {
            staging_dir: staging_dir.clone(),
            archive_path,
            files_found: total,
            records,
            skipped,
            elapsed: start.elapsed(),
        };

        info!(
            consolidated = result.consolidated(),
            skipped,
            archive = %result.archive_path.display(),
            "consolidation complete"
        );
        progress.done(&result);

        Ok(result)
    }

    /// Copy one page into staging and write its sidecar.
    ///
    /// The output name is reserved only once both files are written.
    fn stage_file(
        &self,
        root: &Path,
        file: &Path,
        names: &mut NameRegistry,
    ) -> Result<OutputRecord> {
        let bytes = std::fs::read(file).map_err(|e| DocAtlasError::io(file, e))?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| DocAtlasError::parse(format!("not valid UTF-8: {e}")))?;

        let dir = file.parent().unwrap_or(root);
        let title = first_h1(text).unwrap_or_else(|| file_stem(file));
        let prefix = numeric_prefix(root, dir);
        let name = names.available(&base_name(prefix.as_ref(), dir, &title));

        let staged_name = format!("{name}.{MARKDOWN_EXTENSION}");
        let staged_path = self.config.staging_dir.join(&staged_name);
        let metadata_path = self
            .config
            .staging_dir
            .join(format!("{staged_name}{METADATA_SUFFIX}"));

        std::fs::write(&staged_path, &bytes).map_err(|e| DocAtlasError::io(&staged_path, e))?;
        debug!(source = %file.display(), staged = %staged_path.display(), "copied");

        let modified = self
            .history
            .last_modified(file)
            .unwrap_or_else(|| self.clock.now());
        let metadata = build_metadata(
            self.config,
            &title,
            content_level(text).unwrap_or_default(),
            modified,
            source_uri(self.config.base_url_str(), root, file),
        );

        if let Err(e) = write_json(&metadata_path, &metadata) {
            let _ = std::fs::remove_file(&staged_path);
            return Err(e);
        }
        debug!(path = %metadata_path.display(), "wrote metadata");
        names.reserve(name);

        Ok(OutputRecord {
            source: file.to_path_buf(),
            staged_path,
            metadata_path,
            metadata,
        })
    }
}

/// Create the staging directory, or empty it if it already exists.
///
/// Everything inside is deleted, whatever put it there.
pub fn reset_staging(dir: &Path) -> Result<()> {
    if !dir.exists() {
        info!(path = %dir.display(), "creating staging directory");
        return std::fs::create_dir_all(dir).map_err(|e| DocAtlasError::io(dir, e));
    }

    if !dir.is_dir() {
        return Err(DocAtlasError::config(format!(
            "staging path {} exists and is not a directory",
            dir.display()
        )));
    }

    info!(path = %dir.display(), "cleaning staging directory");
    let entries = std::fs::read_dir(dir).map_err(|e| DocAtlasError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| DocAtlasError::io(dir, e))?;
        let path = entry.path();
        let is_dir = entry
            .file_type()
            .map_err(|e| DocAtlasError::io(&path, e))?
            .is_dir();
        let removed = if is_dir {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        removed.map_err(|e| DocAtlasError::io(&path, e))?;
    }

    Ok(())
}

/// Refuse to run when emptying the staging directory would delete the corpus.
fn guard_source(source: &Path, staging_dir: &Path) -> Result<()> {
    let (Ok(source), Ok(staging)) = (source.canonicalize(), staging_dir.canonicalize()) else {
        return Ok(());
    };

    if source.starts_with(&staging) {
        return Err(DocAtlasError::config(format!(
            "source directory {} lies inside the staging directory {}",
            source.display(),
            staging.display()
        )));
    }
    Ok(())
}

fn file_stem(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write a JSON file (pretty-printed).
fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| DocAtlasError::Serialization(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| DocAtlasError::io(path, e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Zip packaging of the staging directory.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::{debug, info, instrument};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use docatlas_shared::{DocAtlasError, Result};

/// Deflate everything under `dir` into `archive_path`.
///
/// Entry names are relative to `dir`'s parent, so the archive holds a single
/// top-level folder named after `dir`, with its own directory entry even
/// when empty. Returns the number of files written.
#[instrument(skip_all, fields(dir = %dir.display(), archive = %archive_path.display()))]
pub fn write_archive(dir: &Path, archive_path: &Path) -> Result<usize> {
    let root_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            DocAtlasError::validation(format!("cannot archive '{}': no directory name", dir.display()))
        })?;

    let file = File::create(archive_path).map_err(|e| DocAtlasError::io(archive_path, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.add_directory(format!("{root_name}/"), options)
        .map_err(|e| DocAtlasError::Archive(e.to_string()))?;

    let mut files = 0;
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| DocAtlasError::Archive(e.to_string()))?;
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| DocAtlasError::Archive(e.to_string()))?;
        let name = format!("{root_name}/{}", rel.to_string_lossy().replace('\\', "/"));

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)
                .map_err(|e| DocAtlasError::Archive(e.to_string()))?;
            continue;
        }

        zip.start_file(name.as_str(), options)
            .map_err(|e| DocAtlasError::Archive(e.to_string()))?;
        let mut src = File::open(entry.path()).map_err(|e| DocAtlasError::io(entry.path(), e))?;
        std::io::copy(&mut src, &mut zip).map_err(|e| DocAtlasError::io(entry.path(), e))?;

        debug!(entry = %name, "archived");
        files += 1;
    }

    zip.finish()
        .map_err(|e| DocAtlasError::Archive(e.to_string()))?;

    info!(files, "archive written");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("da-archive-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn entry_names(archive: &Path) -> Vec<String> {
        let zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
        let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn archive_contains_folder_and_files() {
        let tmp = temp_dir();
        let staging = tmp.join("rag");
        std::fs::create_dir_all(staging.join("sub")).unwrap();
        std::fs::write(staging.join("a.md"), "# A\n").unwrap();
        std::fs::write(staging.join("sub/b.md"), "# B\n").unwrap();

        let archive = tmp.join("rag.zip");
        let files = write_archive(&staging, &archive).unwrap();
        assert_eq!(files, 2);
        assert_eq!(
            entry_names(&archive),
            vec!["rag/", "rag/a.md", "rag/sub/", "rag/sub/b.md"]
        );

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mut entry = zip.by_name("rag/a.md").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "# A\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_directory_yields_folder_entry_only() {
        let tmp = temp_dir();
        let staging = tmp.join("rag");
        std::fs::create_dir_all(&staging).unwrap();

        let archive = tmp.join("out.zip");
        assert_eq!(write_archive(&staging, &archive).unwrap(), 0);
        assert_eq!(entry_names(&archive), vec!["rag/"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }
}

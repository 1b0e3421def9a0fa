//! Archive packaging for finished crawls
//!
//! Turns a completed destination directory into a single deflate-compressed
//! zip file. Works only on what is already on disk and knows nothing about
//! how the files got there.

use crate::SnapshotError;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// What went into an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Location of the archive
    pub path: PathBuf,

    /// Number of files stored
    pub files: usize,

    /// Number of files left out for exceeding the per-file cap
    pub skipped: usize,

    /// Size of the archive on disk
    pub archive_bytes: u64,
}

/// Zips every regular file under `src_dir` into `archive_path`
///
/// Entry names are relative to `src_dir` with `/` separators. Files larger
/// than `max_file_bytes` are skipped. Symlinks are not followed. On error the
/// partial archive is removed.
///
/// # Errors
///
/// * `SnapshotError::Io` - `src_dir` is unreadable, or `archive_path` lies
///   inside `src_dir`
/// * `SnapshotError::Archive` - The zip writer failed
///
/// # Example
///
/// ```no_run
/// use site_snapshot::archive::zip_directory;
/// use std::path::Path;
///
/// let summary = zip_directory(
///     Path::new("site_download"),
///     Path::new("site_download.zip"),
///     5 * 1024 * 1024,
/// ).unwrap();
/// println!("{} files archived", summary.files);
/// ```
pub fn zip_directory(
    src_dir: &Path,
    archive_path: &Path,
    max_file_bytes: u64,
) -> Result<ArchiveSummary, SnapshotError> {
    ensure_outside(src_dir, archive_path)?;

    let mut files = Vec::new();
    collect_files(src_dir, &mut files)?;

    match write_archive(src_dir, &files, archive_path, max_file_bytes) {
        Ok((stored, skipped)) => {
            let archive_bytes = fs::metadata(archive_path)?.len();
            tracing::info!(
                "Archived {} files into {} ({} bytes, {} skipped)",
                stored,
                archive_path.display(),
                archive_bytes,
                skipped
            );

            Ok(ArchiveSummary {
                path: archive_path.to_path_buf(),
                files: stored,
                skipped,
                archive_bytes,
            })
        }
        Err(e) => {
            let _ = fs::remove_file(archive_path);
            Err(e)
        }
    }
}

fn write_archive(
    src_dir: &Path,
    files: &[PathBuf],
    archive_path: &Path,
    max_file_bytes: u64,
) -> Result<(usize, usize), SnapshotError> {
    let mut writer = ZipWriter::new(File::create(archive_path)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut stored = 0;
    let mut skipped = 0;

    for path in files {
        let size = fs::metadata(path)?.len();
        if size > max_file_bytes {
            tracing::debug!("Skipping oversized file {} ({} bytes)", path.display(), size);
            skipped += 1;
            continue;
        }

        writer.start_file(entry_name(src_dir, path), options)?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut writer)?;
        stored += 1;
    }

    writer.finish()?;
    Ok((stored, skipped))
}

/// Recursively lists regular files, sorted per directory
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), out)?;
        } else if file_type.is_file() {
            out.push(entry.path());
        }
    }

    Ok(())
}

fn entry_name(src_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(src_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn ensure_outside(src_dir: &Path, archive_path: &Path) -> io::Result<()> {
    let src = src_dir.canonicalize()?;
    let parent = match archive_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if parent.canonicalize()?.starts_with(&src) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "archive {} must not be inside {}",
                archive_path.display(),
                src_dir.display()
            ),
        ));
    }

    Ok(())
}

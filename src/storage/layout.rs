use crate::storage::{StorageError, StorageResult};
use std::path::{Path, PathBuf};
use url::Url;

/// File name used when a URL path ends in `/`
pub const DEFAULT_DOCUMENT: &str = "index.html";

/// Longest path segment accepted, in bytes
pub const MAX_SEGMENT_LEN: usize = 255;

/// Deepest directory nesting accepted
pub const MAX_PATH_DEPTH: usize = 64;

/// Maps a URL onto a file path under `dest_dir`
///
/// # Mapping Rules
///
/// 1. Only the path component is used; query and fragment are ignored
/// 2. Empty segments (from `//`) are dropped
/// 3. An empty final segment becomes `index.html`
/// 4. A final segment without an extension gets `.html` appended
///
/// Distinct URLs can map to the same path (`/a?x=1` and `/a?x=2`); the later
/// write replaces the earlier one.
///
/// Segments are used exactly as they appear in the URL, still percent-encoded,
/// so an encoded `%2F` never turns into a separator.
///
/// # Errors
///
/// Returns `StorageError::RejectedPath` for dot segments, backslashes, NUL bytes,
/// over-long segments, or paths nested deeper than `MAX_PATH_DEPTH`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use url::Url;
/// use site_snapshot::storage::map_url_to_path;
///
/// let dest = Path::new("/tmp/site");
/// let url = Url::parse("https://example.com/docs/intro").unwrap();
/// assert_eq!(
///     map_url_to_path(&url, dest).unwrap(),
///     Path::new("/tmp/site/docs/intro.html")
/// );
/// ```
pub fn map_url_to_path(url: &Url, dest_dir: &Path) -> StorageResult<PathBuf> {
    let raw = url.path();
    let mut segments: Vec<&str> = raw.split('/').collect();

    // The last element is the file name; it is empty for "/" and "/dir/"
    let file_segment = segments.pop().unwrap_or("");
    let dirs: Vec<&str> = segments.into_iter().filter(|s| !s.is_empty()).collect();

    if dirs.len() > MAX_PATH_DEPTH {
        return Err(reject(url, format!("more than {} directories", MAX_PATH_DEPTH)));
    }

    let mut path = dest_dir.to_path_buf();
    for segment in &dirs {
        check_segment(url, segment)?;
        path.push(segment);
    }

    let mut file_name = if file_segment.is_empty() {
        DEFAULT_DOCUMENT.to_string()
    } else {
        check_segment(url, file_segment)?;
        file_segment.to_string()
    };

    if Path::new(&file_name).extension().is_none() {
        file_name.push_str(".html");
    }

    if file_name.len() > MAX_SEGMENT_LEN {
        return Err(reject(url, "file name too long".to_string()));
    }

    path.push(file_name);
    Ok(path)
}

fn check_segment(url: &Url, segment: &str) -> StorageResult<()> {
    if segment == "." || segment == ".." {
        return Err(reject(url, format!("dot segment '{}'", segment)));
    }

    if segment.contains('\\') || segment.contains('\0') {
        return Err(reject(url, "illegal character in path".to_string()));
    }

    if segment.len() > MAX_SEGMENT_LEN {
        return Err(reject(url, "path segment too long".to_string()));
    }

    Ok(())
}

fn reject(url: &Url, reason: String) -> StorageError {
    StorageError::RejectedPath {
        url: url.to_string(),
        reason,
    }
}

//! Output path validation
//!
//! User-supplied folders are checked syntactically for the current OS without
//! touching the filesystem. A folder that fails validation, or that cannot be
//! created, never aborts a download: callers fall back to their default
//! download folder.

use path_absolutize::Absolutize;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Longest single path component accepted (NAME_MAX on common filesystems)
const MAX_COMPONENT_LEN: usize = 255;

/// Longest full path accepted on this platform
#[cfg(target_os = "windows")]
const MAX_PATH_LEN: usize = 32_767;
#[cfg(target_os = "macos")]
const MAX_PATH_LEN: usize = 1024;
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const MAX_PATH_LEN: usize = 4096;

/// Characters Windows refuses inside a path component
#[cfg(target_os = "windows")]
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// `true` if `pathname` is a syntactically valid path on the current OS.
///
/// The path does not need to exist. Rejected: empty strings, embedded NUL,
/// paths longer than the platform limit, components longer than 255 bytes and
/// (on Windows) components containing reserved characters.
pub fn is_pathname_valid(pathname: &str) -> bool {
    if pathname.is_empty() || pathname.contains('\0') {
        return false;
    }

    if pathname.len() > MAX_PATH_LEN {
        debug!("Path exceeds {} bytes", MAX_PATH_LEN);
        return false;
    }

    Path::new(pathname).components().all(|component| match component {
        Component::Normal(part) => is_component_valid(&part.to_string_lossy()),
        _ => true,
    })
}

fn is_component_valid(part: &str) -> bool {
    if part.len() > MAX_COMPONENT_LEN {
        return false;
    }

    #[cfg(target_os = "windows")]
    {
        if part.chars().any(|c| c.is_control() || RESERVED_CHARS.contains(&c)) {
            return false;
        }
    }

    true
}

/// Resolve a user-supplied folder into an existing output directory.
///
/// A final component with a file extension (`clips/video.mp4`) is treated as a
/// file name and its parent is used, unless that path is already a directory.
/// Missing directories are created. Returns `None`, meaning "use the default
/// folder", when the folder is invalid or cannot be created.
pub fn resolve_output_dir(folder: &str) -> Option<PathBuf> {
    if !is_pathname_valid(folder) {
        warn!(
            "{} is not a valid path, using the default download folder instead",
            folder.escape_debug()
        );
        return None;
    }

    let path = Path::new(folder);
    let dir = if !path.is_dir() && looks_like_file(path) {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    } else {
        path
    };

    let dir = match dir.absolutize() {
        Ok(dir) => dir.into_owned(),
        Err(e) => {
            warn!("Cannot normalize {}: {}", dir.display(), e);
            return None;
        }
    };

    if !dir.is_dir() {
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(
                "Error occurred when creating directory {}: {}. Using the default download folder instead",
                dir.display(),
                e
            );
            return None;
        }
        debug!("Created output directory {}", dir.display());
    }

    Some(dir)
}

fn looks_like_file(path: &Path) -> bool {
    path.extension().is_some()
}

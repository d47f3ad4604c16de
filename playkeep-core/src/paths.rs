use std::path::{Path, PathBuf};

/// How a queue entry's path string should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PathKind {
    /// `scheme://...`, handed to the player untouched
    Remote,
    /// `/...` or `C:\...`
    Absolute,
    /// Anything else, relative to the player's working directory
    Relative,
}

impl PathKind {
    pub fn is_local(&self) -> bool {
        !matches!(self, PathKind::Remote)
    }
}

/// Classify a path string without touching the filesystem.
pub fn classify(path: &str) -> PathKind {
    if is_remote_uri(path) {
        return PathKind::Remote;
    }

    let bytes = path.as_bytes();
    let is_drive_path = bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && bytes[2] == b'\\';

    if path.starts_with('/') || is_drive_path {
        PathKind::Absolute
    } else {
        PathKind::Relative
    }
}

fn is_remote_uri(path: &str) -> bool {
    match path.find("://") {
        Some(0) | None => false,
        Some(idx) => path[..idx].bytes().all(|b| b.is_ascii_alphabetic()),
    }
}

/// Resolve a relative path against `working_dir`.
///
/// Remote and absolute paths come back unchanged. When the host cannot tell
/// us its working directory we use our own; if even that is unavailable the
/// path is returned as-is.
pub fn resolve_absolute(path: &str, working_dir: Option<&Path>) -> String {
    if classify(path) != PathKind::Relative {
        return path.to_string();
    }

    let base: PathBuf = match working_dir {
        Some(dir) => dir.to_path_buf(),
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                log::warn!("Cannot determine working directory for {:?}: {}", path, e);
                return path.to_string();
            }
        },
    };

    base.join(path).to_string_lossy().into_owned()
}

/// Comparison key for duplicate detection. Never use it for I/O.
pub fn normalize_for_comparison(path: &str) -> String {
    let unified = path.replace('\\', "/");
    unified.trim_end_matches('/').to_lowercase()
}

use std::path::Path;

use crate::paths;

/// Whether a queue entry should be treated as playable.
///
/// Remote URIs are trusted without a network probe. Local paths must resolve
/// to something the filesystem can stat; a missing file is just `false`.
pub fn is_reachable(path: &str, working_dir: Option<&Path>) -> bool {
    if !paths::classify(path).is_local() {
        return true;
    }

    let absolute = paths::resolve_absolute(path, working_dir);
    std::fs::metadata(&absolute).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_is_always_reachable() {
        assert!(is_reachable("https://does.not.exist/a.mp3", None));
    }

    #[test]
    fn local_paths_use_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("here.flac"), b"x").unwrap();

        assert!(is_reachable("here.flac", Some(dir.path())));
        assert!(!is_reachable("gone.flac", Some(dir.path())));

        let absolute = dir.path().join("here.flac");
        assert!(is_reachable(&absolute.to_string_lossy(), None));
    }

    #[test]
    fn directories_count_as_reachable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_reachable(&dir.path().to_string_lossy(), None));
    }
}

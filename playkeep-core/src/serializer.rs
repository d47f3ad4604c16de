use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{PersistError, Result};
use crate::paths;
use crate::queue::QueueItem;
use crate::reachability;
use crate::session::SessionState;

/// What asked for the save
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SaveTrigger {
    /// Debounced queue-change notification
    Change,
    /// Player shutting down
    Shutdown,
    /// Explicit user request
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SkipReason {
    #[strum(serialize = "a load is in progress")]
    Suppressed,
    #[strum(serialize = "the queue is empty")]
    EmptyQueue,
    #[strum(serialize = "the saved queue has not been loaded yet")]
    LoadPending,
    #[strum(serialize = "no queue entry exists")]
    NothingReachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Number of lines written
    Written(usize),
    Skipped(SkipReason),
}

/// Write `queue` to `target`, one absolute path or URI per line.
///
/// The guards run in a fixed order and a skipped save leaves `target`
/// untouched. On success the file is fully replaced.
pub fn save(
    queue: &[QueueItem],
    target: &Path,
    state: &SessionState,
    trigger: SaveTrigger,
    working_dir: Option<&Path>,
) -> Result<SaveOutcome> {
    if let Some(reason) = skip_reason(queue, state, trigger, working_dir) {
        log::info!("Not saving queue ({} trigger): {}", trigger, reason);
        return Ok(SaveOutcome::Skipped(reason));
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
    }

    let file = File::create(target).map_err(|e| PersistError::io(target, e))?;
    let mut writer = BufWriter::new(file);

    for item in queue {
        let line = if paths::classify(&item.path).is_local() {
            paths::resolve_absolute(&item.path, working_dir)
        } else {
            item.path.clone()
        };
        writeln!(writer, "{}", line).map_err(|e| PersistError::io(target, e))?;
    }
    writer.flush().map_err(|e| PersistError::io(target, e))?;

    log::info!(
        "Saved {} queue entries to {} ({} trigger)",
        queue.len(),
        target.display(),
        trigger
    );
    Ok(SaveOutcome::Written(queue.len()))
}

fn skip_reason(
    queue: &[QueueItem],
    state: &SessionState,
    trigger: SaveTrigger,
    working_dir: Option<&Path>,
) -> Option<SkipReason> {
    if state.save_suppressed {
        return Some(SkipReason::Suppressed);
    }
    if queue.is_empty() {
        return Some(SkipReason::EmptyQueue);
    }
    if trigger == SaveTrigger::Shutdown && !state.load_completed {
        return Some(SkipReason::LoadPending);
    }
    // Don't replace a possibly good file with a queue of stale references.
    let any_reachable = queue
        .iter()
        .any(|item| reachability::is_reachable(&item.path, working_dir));
    if !any_reachable {
        return Some(SkipReason::NothingReachable);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(paths: &[&str]) -> Vec<QueueItem> {
        paths
            .iter()
            .enumerate()
            .map(|(id, path)| QueueItem {
                id,
                path: path.to_string(),
            })
            .collect()
    }

    fn loaded() -> SessionState {
        SessionState {
            load_completed: true,
            save_suppressed: false,
        }
    }

    #[test]
    fn writes_absolute_paths_and_uris() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"").unwrap();
        let target = dir.path().join("queue.txt");

        let queue = items(&["a.mp3", "https://radio.example/stream"]);
        let outcome = save(
            &queue,
            &target,
            &loaded(),
            SaveTrigger::Change,
            Some(dir.path()),
        )
        .unwrap();

        assert_eq!(outcome, SaveOutcome::Written(2));
        let expected = format!(
            "{}\nhttps://radio.example/stream\n",
            dir.path().join("a.mp3").display()
        );
        assert_eq!(std::fs::read_to_string(&target).unwrap(), expected);
    }

    #[test]
    fn keeps_unreachable_entries_once_one_is_reachable() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("queue.txt");
        let queue = items(&["/definitely/missing.mp3", "http://x/y"]);

        let outcome = save(&queue, &target, &loaded(), SaveTrigger::Manual, None).unwrap();
        assert_eq!(outcome, SaveOutcome::Written(2));
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "/definitely/missing.mp3\nhttp://x/y\n"
        );
    }

    #[test]
    fn guards_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("queue.txt");
        let missing = items(&["/definitely/missing.mp3"]);

        let suppressed = SessionState {
            load_completed: false,
            save_suppressed: true,
        };
        assert_eq!(
            save(&[], &target, &suppressed, SaveTrigger::Shutdown, None).unwrap(),
            SaveOutcome::Skipped(SkipReason::Suppressed)
        );
        assert_eq!(
            save(&[], &target, &SessionState::new(), SaveTrigger::Shutdown, None).unwrap(),
            SaveOutcome::Skipped(SkipReason::EmptyQueue)
        );
        assert_eq!(
            save(&missing, &target, &SessionState::new(), SaveTrigger::Shutdown, None).unwrap(),
            SaveOutcome::Skipped(SkipReason::LoadPending)
        );
        assert_eq!(
            save(&missing, &target, &SessionState::new(), SaveTrigger::Change, None).unwrap(),
            SaveOutcome::Skipped(SkipReason::NothingReachable)
        );
        assert!(!target.exists());
    }

    #[test]
    fn skipped_save_leaves_existing_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("queue.txt");
        std::fs::write(&target, "/old/entry.mp3\n").unwrap();

        let queue = items(&["/definitely/missing.mp3"]);
        let outcome = save(&queue, &target, &loaded(), SaveTrigger::Change, None).unwrap();

        assert_eq!(outcome, SaveOutcome::Skipped(SkipReason::NothingReachable));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "/old/entry.mp3\n");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/queue.txt");
        let queue = items(&["http://x/y"]);

        save(&queue, &target, &loaded(), SaveTrigger::Change, None).unwrap();
        assert!(target.exists());
    }

    #[test]
    fn unwritable_target_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for writing.
        let queue = items(&["http://x/y"]);
        let err = save(&queue, dir.path(), &loaded(), SaveTrigger::Change, None).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }
}

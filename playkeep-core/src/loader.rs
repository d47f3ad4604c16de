use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::LoadMode;
use crate::error::{PersistError, Result};
use crate::host::PlayerHost;
use crate::paths;
use crate::reachability;
use crate::session::SessionState;

/// Restore the persisted queue into the live one and return how many entries
/// were inserted.
///
/// Sets `state.save_suppressed`; clearing it is left to the caller so that
/// notifications the player emits after this returns are still covered.
pub fn load<H: PlayerHost + ?Sized>(
    target: &Path,
    host: &mut H,
    mode: LoadMode,
    state: &mut SessionState,
) -> Result<usize> {
    if std::fs::metadata(target).is_err() {
        log::info!("No saved queue at {}", target.display());
        return Ok(0);
    }

    let working_dir = host.working_directory();
    let working_dir = working_dir.as_deref();

    state.save_suppressed = true;

    let file = File::open(target).map_err(|e| PersistError::io(target, e))?;
    let reader = BufReader::new(file);

    let mut present: HashSet<String> = host
        .queue()
        .iter()
        .map(|item| comparison_key(&item.path, working_dir))
        .collect();

    let mut inserted = 0;
    for (line_no, raw) in reader.split(b'\n').enumerate() {
        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                // Keep what was restored so far
                log::error!("Stopped reading {}: {}", target.display(), e);
                break;
            }
        };
        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(_) => {
                log::warn!("Skipping line {} of {}: not UTF-8", line_no + 1, target.display());
                continue;
            }
        };

        let entry = line.trim_end_matches('\r');
        if entry.trim().is_empty() {
            continue;
        }

        let key = comparison_key(entry, working_dir);
        if present.contains(&key) {
            log::debug!("Already queued, skipping {}", entry);
            continue;
        }

        if !reachability::is_reachable(entry, working_dir) {
            log::warn!("Skipping missing file {}", entry);
            continue;
        }

        let insert_mode = if inserted == 0 { mode } else { LoadMode::Append };
        host.append_or_replace(entry, insert_mode);

        if insert_mode == LoadMode::Replace {
            present.clear();
        }
        present.insert(key);
        inserted += 1;
    }

    log::info!(
        "Restored {} queue entries from {} ({} mode)",
        inserted,
        target.display(),
        mode
    );
    Ok(inserted)
}

/// Non-blank lines of a persisted queue file; empty when there is no file.
pub fn read_persisted(target: &Path) -> Result<Vec<String>> {
    let content = match std::fs::read_to_string(target) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PersistError::io(target, e)),
    };

    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

fn comparison_key(path: &str, working_dir: Option<&Path>) -> String {
    paths::normalize_for_comparison(&paths::resolve_absolute(path, working_dir))
}

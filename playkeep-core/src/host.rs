use std::path::{Path, PathBuf};

use crate::config::{self, LoadMode};
use crate::queue::{PlaybackQueue, QueueItem};

/// What the persistence layer needs from the media player that owns the queue.
///
/// Change and shutdown notifications flow the other way: the player calls the
/// matching [`Orchestrator`](crate::orchestrator::Orchestrator) handler.
pub trait PlayerHost {
    /// Current queue, in playback order
    fn queue(&self) -> Vec<QueueItem>;

    fn queue_count(&self) -> usize {
        self.queue().len()
    }

    /// Insert `path`; `Replace` discards the existing queue first.
    fn append_or_replace(&mut self, path: &str, mode: LoadMode);

    /// Directory relative queue entries are resolved against
    fn working_directory(&self) -> Option<PathBuf>;

    fn resolve_config_path(&self, template: &str) -> PathBuf {
        config::expand_path_template(template)
    }
}

/// Plain in-memory host: the queue with no player around it.
#[derive(Debug, Default)]
pub struct MemoryHost {
    pub queue: PlaybackQueue,
    pub working_dir: Option<PathBuf>,
}

impl MemoryHost {
    pub fn new(working_dir: Option<&Path>) -> Self {
        Self {
            queue: PlaybackQueue::new(),
            working_dir: working_dir.map(Path::to_path_buf),
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.queue.paths().map(str::to_string).collect()
    }
}

impl PlayerHost for MemoryHost {
    fn queue(&self) -> Vec<QueueItem> {
        self.queue.items.clone()
    }

    fn queue_count(&self) -> usize {
        self.queue.len()
    }

    fn append_or_replace(&mut self, path: &str, mode: LoadMode) {
        if mode == LoadMode::Replace {
            self.queue.clear();
        }
        self.queue.add([path]);
    }

    fn working_directory(&self) -> Option<PathBuf> {
        self.working_dir.clone()
    }
}

/// Notifications a player emits towards the persistence layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The queue was mutated; carries its new length
    QueueChanged { count: usize },
    /// The player is about to exit
    Shutdown,
}

use std::path::PathBuf;

use crossbeam_channel::Sender;
use playkeep_core::{LoadMode, PlaybackQueue, PlayerEvent, PlayerHost, QueueItem};

/// In-process player owning the live queue.
///
/// Every mutation is announced on `event_tx`; the main loop drains those
/// notifications between handlers, so they arrive slightly after the call
/// that caused them, as with a real player.
pub struct SessionPlayer {
    queue: PlaybackQueue,
    working_dir: Option<PathBuf>,
    event_tx: Sender<PlayerEvent>,
}

impl SessionPlayer {
    pub fn new(event_tx: Sender<PlayerEvent>, working_dir: Option<PathBuf>) -> Self {
        Self {
            queue: PlaybackQueue::new(),
            working_dir,
            event_tx,
        }
    }

    pub fn add(&mut self, path: String) {
        log::debug!("Queueing {}", path);
        self.queue.add([path]);
        self.notify_changed();
    }

    /// Remove by 0-based position, returns the removed path
    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        let item = self.queue.get(index)?.clone();
        self.queue.remove(item.id);
        self.notify_changed();
        Some(item.path)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.notify_changed();
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.queue.items
    }

    pub fn current(&self) -> Option<&QueueItem> {
        self.queue.current()
    }

    pub fn shutdown(&self) {
        let _ = self.event_tx.send(PlayerEvent::Shutdown);
    }

    fn notify_changed(&self) {
        let _ = self.event_tx.send(PlayerEvent::QueueChanged {
            count: self.queue.len(),
        });
    }
}

impl PlayerHost for SessionPlayer {
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
        self.add(path.to_string());
    }

    fn working_directory(&self) -> Option<PathBuf> {
        self.working_dir.clone()
    }
}

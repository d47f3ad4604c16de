/// A single item in the playback queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    pub id: usize,
    /// Either a `scheme://` URI or a filesystem path, as the user gave it
    pub path: String,
}

/// The playback queue state
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    pub items: Vec<QueueItem>,
    pub current_index: Option<usize>,
    next_id: usize,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add paths to queue, returns assigned IDs
    pub fn add<I, S>(&mut self, paths: I) -> Vec<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids = Vec::new();
        for path in paths {
            let id = self.next_id;
            self.next_id += 1;
            self.items.push(QueueItem {
                id,
                path: path.into(),
            });
            ids.push(id);
        }
        if self.current_index.is_none() && !self.items.is_empty() {
            self.current_index = Some(0);
        }
        ids
    }

    /// Remove item by ID, returns true if found and removed
    pub fn remove(&mut self, id: usize) -> bool {
        if let Some(pos) = self.items.iter().position(|item| item.id == id) {
            self.items.remove(pos);
            // Adjust current_index if needed
            if let Some(idx) = self.current_index {
                if pos < idx {
                    self.current_index = Some(idx - 1);
                } else if pos == idx {
                    if self.items.is_empty() {
                        self.current_index = None;
                    } else if idx >= self.items.len() {
                        self.current_index = Some(self.items.len() - 1);
                    }
                }
            }
            true
        } else {
            false
        }
    }

    /// Clear all items from queue
    pub fn clear(&mut self) {
        self.items.clear();
        self.current_index = None;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get current track
    pub fn current(&self) -> Option<&QueueItem> {
        self.current_index.and_then(|i| self.items.get(i))
    }

    /// Get item by index
    pub fn get(&self, index: usize) -> Option<&QueueItem> {
        self.items.get(index)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.path.as_str())
    }
}

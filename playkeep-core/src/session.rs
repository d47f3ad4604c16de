/// Per-run persistence flags. Never written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Set once the startup load ran (or was skipped); until then a shutdown
    /// save could clobber a file nobody has read yet.
    pub load_completed: bool,
    /// True while a load is inserting into the live queue, plus a short tail
    /// for notifications the player emits late.
    pub save_suppressed: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

//! Keeps a media player's playback queue across sessions.
//!
//! The queue is written to a plain text file (one absolute path or URI per
//! line) shortly after it changes and when the player exits, and read back
//! into the player on the next start.

pub mod config;
pub mod error;
pub mod host;
pub mod loader;
pub mod orchestrator;
pub mod paths;
pub mod queue;
pub mod reachability;
pub mod scheduler;
pub mod serializer;
pub mod session;

pub use config::{LoadMode, PersistConfig};
pub use error::{PersistError, Result};
pub use host::{MemoryHost, PlayerEvent, PlayerHost};
pub use orchestrator::Orchestrator;
pub use queue::{PlaybackQueue, QueueItem};
pub use scheduler::{Scheduler, Timer, TimerHandle, TimerQueue};
pub use serializer::{SaveOutcome, SaveTrigger, SkipReason};
pub use session::SessionState;

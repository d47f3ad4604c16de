use std::path::{Path, PathBuf};

use crate::config::PersistConfig;
use crate::host::{PlayerEvent, PlayerHost};
use crate::loader;
use crate::paths;
use crate::scheduler::{Scheduler, Timer, TimerHandle};
use crate::serializer::{self, SaveOutcome, SaveTrigger};
use crate::session::SessionState;

/// Binds player events to saving and restoring the queue.
///
/// The player calls one handler per event and feeds fired timers back through
/// [`Orchestrator::on_timer`]. Handlers never fail; I/O problems are logged and
/// the player carries on with its queue untouched.
#[derive(Debug)]
pub struct Orchestrator {
    config: PersistConfig,
    target: PathBuf,
    state: SessionState,
    pending_save: Option<TimerHandle>,
    pending_lift: Option<TimerHandle>,
}

impl Orchestrator {
    pub fn new(config: PersistConfig, target: PathBuf) -> Self {
        Self {
            config,
            target,
            state: SessionState::new(),
            pending_save: None,
            pending_lift: None,
        }
    }

    /// Build with the playlist file resolved through the host's path rules.
    ///
    /// A relative result is anchored to the host's working directory once, so
    /// every later check, read and write uses the same file.
    pub fn for_host<H: PlayerHost + ?Sized>(config: PersistConfig, host: &H) -> Self {
        let target = host.resolve_config_path(&config.playlist_file);
        let target = if target.is_relative() {
            let working_dir = host.working_directory();
            PathBuf::from(paths::resolve_absolute(
                &target.to_string_lossy(),
                working_dir.as_deref(),
            ))
        } else {
            target
        };
        Self::new(config, target)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn on_start<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if self.config.load_on_start {
            scheduler.schedule_after(self.config.startup_delay(), Timer::StartupLoad);
        } else {
            log::debug!("load_on_start disabled");
            self.state.load_completed = true;
        }
    }

    /// Queue mutated; `queue_count` is its length afterwards.
    pub fn on_queue_changed<S: Scheduler + ?Sized>(&mut self, queue_count: usize, scheduler: &mut S) {
        if !self.config.save_on_playlist_change || queue_count == 0 {
            return;
        }

        if let Some(handle) = self.pending_save.take() {
            scheduler.cancel(handle);
        }
        self.pending_save =
            Some(scheduler.schedule_after(self.config.save_delay(), Timer::DebouncedSave));
    }

    pub fn on_shutdown<H: PlayerHost + ?Sized>(&mut self, host: &H) -> Option<SaveOutcome> {
        if !self.config.save_on_exit {
            return None;
        }
        self.save(host, SaveTrigger::Shutdown)
    }

    pub fn on_event<H, S>(&mut self, event: &PlayerEvent, host: &H, scheduler: &mut S) -> Option<SaveOutcome>
    where
        H: PlayerHost + ?Sized,
        S: Scheduler + ?Sized,
    {
        match event {
            PlayerEvent::QueueChanged { count } => {
                self.on_queue_changed(*count, scheduler);
                None
            }
            PlayerEvent::Shutdown => self.on_shutdown(host),
        }
    }

    /// Dispatch a fired timer. Returns the outcome when it was a save.
    pub fn on_timer<H, S>(&mut self, timer: Timer, host: &mut H, scheduler: &mut S) -> Option<SaveOutcome>
    where
        H: PlayerHost + ?Sized,
        S: Scheduler + ?Sized,
    {
        log::debug!("Timer fired: {}", timer);
        match timer {
            Timer::DebouncedSave => {
                self.pending_save = None;
                self.save(host, SaveTrigger::Change)
            }
            Timer::LiftSaveSuppression => {
                self.pending_lift = None;
                self.state.save_suppressed = false;
                None
            }
            Timer::StartupLoad => {
                if !self.state.load_completed {
                    self.load(host, scheduler);
                    self.state.load_completed = true;
                }
                None
            }
        }
    }

    /// User-requested save; the shutdown guard does not apply
    pub fn save_now<H: PlayerHost + ?Sized>(&mut self, host: &H) -> Option<SaveOutcome> {
        self.save(host, SaveTrigger::Manual)
    }

    /// User-requested load, allowed even after the startup load ran
    pub fn load_now<H, S>(&mut self, host: &mut H, scheduler: &mut S) -> usize
    where
        H: PlayerHost + ?Sized,
        S: Scheduler + ?Sized,
    {
        let count = self.load(host, scheduler);
        self.state.load_completed = true;
        count
    }

    fn save<H: PlayerHost + ?Sized>(&mut self, host: &H, trigger: SaveTrigger) -> Option<SaveOutcome> {
        let queue = host.queue();
        let working_dir = host.working_directory();
        match serializer::save(&queue, &self.target, &self.state, trigger, working_dir.as_deref()) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::error!("Failed to save queue: {}", e);
                None
            }
        }
    }

    fn load<H, S>(&mut self, host: &mut H, scheduler: &mut S) -> usize
    where
        H: PlayerHost + ?Sized,
        S: Scheduler + ?Sized,
    {
        let result = loader::load(&self.target, host, self.config.load_mode, &mut self.state);

        if self.state.save_suppressed {
            if let Some(handle) = self.pending_lift.take() {
                scheduler.cancel(handle);
            }
            self.pending_lift = Some(
                scheduler.schedule_after(self.config.suppress_window(), Timer::LiftSaveSuppression),
            );
        }

        match result {
            Ok(count) => count,
            Err(e) => {
                log::error!("Failed to load queue: {}", e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::host::MemoryHost;
    use crate::scheduler::TimerQueue;

    #[test]
    fn disabled_startup_load_marks_load_completed() {
        let config = PersistConfig {
            load_on_start: false,
            ..PersistConfig::default()
        };
        let mut orchestrator = Orchestrator::new(config, PathBuf::from("/nonexistent/q.txt"));
        let mut timers = TimerQueue::new(Instant::now());

        orchestrator.on_start(&mut timers);

        assert!(orchestrator.state().load_completed);
        assert!(timers.is_empty());
    }

    #[test]
    fn empty_queue_notifications_schedule_nothing() {
        let mut orchestrator =
            Orchestrator::new(PersistConfig::default(), PathBuf::from("/nonexistent/q.txt"));
        let mut timers = TimerQueue::new(Instant::now());

        orchestrator.on_queue_changed(0, &mut timers);
        assert!(timers.is_empty());
    }

    #[test]
    fn change_saving_can_be_disabled() {
        let config = PersistConfig {
            save_on_playlist_change: false,
            ..PersistConfig::default()
        };
        let mut orchestrator = Orchestrator::new(config, PathBuf::from("/nonexistent/q.txt"));
        let mut timers = TimerQueue::new(Instant::now());

        orchestrator.on_queue_changed(3, &mut timers);
        assert!(timers.is_empty());
    }

    #[test]
    fn exit_saving_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = PersistConfig {
            save_on_exit: false,
            load_on_start: false,
            ..PersistConfig::default()
        };
        let mut orchestrator = Orchestrator::new(config, dir.path().join("q.txt"));
        let mut timers = TimerQueue::new(Instant::now());
        orchestrator.on_start(&mut timers);

        let mut host = MemoryHost::new(Some(dir.path()));
        host.queue.add(["http://a/1"]);

        assert_eq!(orchestrator.on_shutdown(&host), None);
        assert!(!orchestrator.target().exists());
    }

    #[test]
    fn startup_load_runs_once() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("q.txt");
        std::fs::write(&target, "http://a/1\n").unwrap();

        let mut orchestrator = Orchestrator::new(PersistConfig::default(), target);
        let mut host = MemoryHost::new(Some(dir.path()));
        let t0 = Instant::now();
        let mut timers = TimerQueue::new(t0);

        orchestrator.on_start(&mut timers);
        orchestrator.on_timer(Timer::StartupLoad, &mut host, &mut timers);
        host.queue.clear();
        orchestrator.on_timer(Timer::StartupLoad, &mut host, &mut timers);

        assert!(host.queue.is_empty());
        assert!(orchestrator.state().load_completed);

        // The first load armed the suppression lift.
        let later = t0 + Duration::from_secs(10);
        let mut fired = Vec::new();
        while let Some(timer) = timers.pop_due(later) {
            fired.push(timer);
        }
        assert!(fired.contains(&Timer::LiftSaveSuppression));
    }

    #[test]
    fn relative_queue_file_is_anchored_to_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = PersistConfig {
            playlist_file: "queue.txt".to_string(),
            ..PersistConfig::default()
        };
        let host = MemoryHost::new(Some(dir.path()));

        let orchestrator = Orchestrator::for_host(config, &host);
        assert_eq!(orchestrator.target(), dir.path().join("queue.txt"));
        assert_eq!(orchestrator.config().playlist_file, "queue.txt");
    }

    #[test]
    fn unreadable_saved_queue_is_logged_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // Opening a directory for line reads fails once reading starts.
        let mut orchestrator = Orchestrator::new(PersistConfig::default(), dir.path().to_path_buf());
        let mut host = MemoryHost::new(Some(dir.path()));
        let mut timers = TimerQueue::new(Instant::now());

        assert_eq!(orchestrator.load_now(&mut host, &mut timers), 0);
        assert!(orchestrator.state().load_completed);
        assert!(host.queue.is_empty());
    }
}

//! Persistence options and where to find them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use strum::EnumString;

use crate::error::{PersistError, Result};

/// Directory name used under the per-user config dir.
pub const APP_DIR_NAME: &str = "playkeep";
pub const CONFIG_FILE_NAME: &str = "playkeep.toml";

/// How the first restored entry is inserted into the live queue
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumString,
    strum::Display,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LoadMode {
    /// Add after the current queue tail
    #[default]
    Append,
    /// Drop whatever is queued first
    Replace,
}

/// Options recognised by the queue persistence layer.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PersistConfig {
    /// Path template of the persisted queue; `~~/` is the app config dir
    pub playlist_file: String,
    pub save_on_playlist_change: bool,
    pub save_on_exit: bool,
    pub load_on_start: bool,
    pub load_mode: LoadMode,
    /// Debounce window for change-triggered saves
    pub save_delay_ms: u64,
    /// How long saves stay suppressed after a load finished inserting
    pub suppress_window_ms: u64,
    /// Settling delay before the startup load
    pub startup_delay_ms: u64,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            playlist_file: "~~/playlist_autosave.txt".to_string(),
            save_on_playlist_change: true,
            save_on_exit: true,
            load_on_start: true,
            load_mode: LoadMode::Append,
            save_delay_ms: 1000,
            suppress_window_ms: 1000,
            startup_delay_ms: 1000,
        }
    }
}

impl PersistConfig {
    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }

    pub fn suppress_window(&self) -> Duration {
        Duration::from_millis(self.suppress_window_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Read options from a TOML file. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(PersistError::io(path, e)),
        };

        toml::from_str(&content).map_err(|source| PersistError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `<config_dir>/playkeep`, if the platform has a config dir at all.
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
}

pub fn default_config_path() -> Option<PathBuf> {
    app_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Expand `~~/` (app config dir) and `~/` (home dir) prefixes.
///
/// Anything else, including templates whose base directory is unknown on this
/// platform, is returned unchanged.
pub fn expand_path_template(template: &str) -> PathBuf {
    expand_with(template, app_config_dir(), dirs::home_dir())
}

fn expand_with(template: &str, config_dir: Option<PathBuf>, home_dir: Option<PathBuf>) -> PathBuf {
    if let Some(rest) = template.strip_prefix("~~/") {
        if let Some(dir) = config_dir {
            return dir.join(rest);
        }
    } else if let Some(rest) = template.strip_prefix("~/") {
        if let Some(dir) = home_dir {
            return dir.join(rest);
        }
    }
    PathBuf::from(template)
}

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/shadowing/config.toml` or `~/.config/shadowing/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SHADOWING__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the database, imported audio and logs live.
    ///
    /// Defaults to `$XDG_DATA_HOME/shadowing` or `~/.local/share/shadowing`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// SQLite database file name inside the data directory.
    pub database_file: String,
    /// Directory inside the data directory chosen files are copied into.
    pub audio_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_file: "shadowing.db".to_string(),
            audio_dir: "audio".to_string(),
        }
    }
}

impl StorageSettings {
    /// The configured data directory, or the XDG default. Falls back to the
    /// working directory when no home is known.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
            Some(PathBuf::from(xdg))
        } else {
            env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
        };
        data_home
            .map(|d| d.join("shadowing"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(&self.database_file)
    }

    pub fn audio_path(&self) -> PathBuf {
        self.data_dir().join(&self.audio_dir)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often the progress bar refreshes and end-of-audio is checked (milliseconds).
    pub progress_interval_ms: u64,
    /// How often listening time is accumulated (milliseconds).
    /// Every firing while audio plays adds one second of spend time.
    pub duration_interval_ms: u64,
    /// How often the end of the current bookmark segment is checked (milliseconds).
    pub boundary_interval_ms: u64,
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_seconds: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            progress_interval_ms: 100,
            duration_interval_ms: 1000,
            boundary_interval_ms: 100,
            seek_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Key that removes the bookmark under the cursor on the player screen.
    pub remove_bookmark_key: String,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            remove_bookmark_key: "x".to_string(),
        }
    }
}

impl ControlsSettings {
    /// The remove key as a single character, `None` when misconfigured.
    pub fn remove_key(&self) -> Option<char> {
        let mut chars = self.remove_bookmark_key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Directory the file chooser lists. Defaults to the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_dir: Option<PathBuf>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ shadowing ~ ".to_string(),
            start_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "wav".into(),
                "ogg".into(),
                "flac".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: false,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Whether to write a log file at all.
    pub enabled: bool,
    /// Default filter directive, overridden by `SHADOWING_LOG`.
    pub level: String,
    /// Log file name inside `<data dir>/logs`.
    pub file_name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file_name: "shadowing.log".to_string(),
        }
    }
}

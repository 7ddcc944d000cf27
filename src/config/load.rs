use std::{env, path::PathBuf};

use super::schema::Settings;

/// Keys the player screen already binds; the remove key may not shadow them.
const RESERVED_KEYS: [char; 6] = [' ', 's', 'b', 'q', 'H', 'L'];

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `SHADOWING__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SHADOWING")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let playback = &self.playback;
        for (name, value) in [
            ("playback.progress_interval_ms", playback.progress_interval_ms),
            ("playback.duration_interval_ms", playback.duration_interval_ms),
            ("playback.boundary_interval_ms", playback.boundary_interval_ms),
        ] {
            if value == 0 {
                return Err(format!("{name} must be >= 1"));
            }
        }

        match self.controls.remove_key() {
            None => {
                return Err("controls.remove_bookmark_key must be a single character".to_string());
            }
            Some(c) if RESERVED_KEYS.contains(&c) => {
                return Err(format!(
                    "controls.remove_bookmark_key '{c}' is already bound"
                ));
            }
            Some(_) => {}
        }

        if self.storage.database_file.trim().is_empty() {
            return Err("storage.database_file must not be empty".to_string());
        }
        if self.storage.audio_dir.trim().is_empty() {
            return Err("storage.audio_dir must not be empty".to_string());
        }
        Ok(())
    }

    /// The effective settings as TOML, for `--print-config`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the config path from `SHADOWING_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SHADOWING_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/shadowing/config.toml`
/// or `~/.config/shadowing/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("shadowing").join("config.toml"))
}

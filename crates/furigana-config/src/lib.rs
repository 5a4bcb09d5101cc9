use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the default settings location.
pub const CONFIG_PATH_ENV: &str = "FURIGANA_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Show rendered readings over markup while editing.
    #[serde(rename = "furiganaSource", default = "default_furigana_source")]
    pub furigana_source: bool,

    /// Inclusive code point ranges accepted as annotated base text.
    /// Falls back to the built-in CJK ranges when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_ranges: Option<Vec<[char; 2]>>,
}

fn default_furigana_source() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            furigana_source: default_furigana_source(),
            base_ranges: None,
        }
    }
}

impl Settings {
    /// `Ok(None)` when no settings file has been written yet.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ConfigReadError {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })
    }

    /// Load settings, using defaults when no file exists yet.
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        Ok(Self::load_from_path(config_path)?.unwrap_or_default())
    }

    /// Write the settings, creating parent directories as needed.
    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write settings to {}", config_path.display()))?;
        log::debug!("settings written to {}", config_path.display());
        Ok(())
    }

    /// Base ranges as `(start, end)` pairs, if configured.
    pub fn base_range_pairs(&self) -> Option<Vec<(char, char)>> {
        self.base_ranges
            .as_ref()
            .map(|ranges| ranges.iter().map(|[start, end]| (*start, *end)).collect())
    }

    /// `$FURIGANA_CONFIG` if set, otherwise `~/.config/furigana/config.toml`.
    pub fn config_path() -> PathBuf {
        Self::resolve_config_path(std::env::var(CONFIG_PATH_ENV).ok().as_deref())
    }

    fn resolve_config_path(override_path: Option<&str>) -> PathBuf {
        if let Some(path) = override_path.filter(|p| !p.is_empty()) {
            let path = PathBuf::from(path);
            return Self::expand_path(&path).unwrap_or(path);
        }
        let config_dir = shellexpand::tilde("~/.config/furigana");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

/// Settings bound to the file they came from. Changes are written back at once.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let settings = Settings::load_or_default(&path)?;
        Ok(Self { path, settings })
    }

    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(Settings::config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn furigana_source(&self) -> bool {
        self.settings.furigana_source
    }

    pub fn set_furigana_source(&mut self, enabled: bool) -> anyhow::Result<()> {
        self.settings.furigana_source = enabled;
        self.settings.save_to_path(&self.path)?;
        log::info!(
            "furiganaSource set to {enabled}, saved to {}",
            self.path.display()
        );
        Ok(())
    }

    /// Flip the editing preference and persist it. Returns the new value.
    pub fn toggle_furigana_source(&mut self) -> anyhow::Result<bool> {
        let enabled = !self.settings.furigana_source;
        self.set_furigana_source(enabled)?;
        Ok(enabled)
    }
}

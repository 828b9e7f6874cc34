//! Configuration management for ninjaview

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NinjaviewError, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Ninja binary to run
    pub ninja_binary: Option<PathBuf>,
    /// Default build directory
    pub build_dir: Option<PathBuf>,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Keyboard poll interval in milliseconds
    pub tick_rate_ms: u64,
    /// Maximum messages drained from the log stream per tick
    pub max_messages_per_tick: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log file path used while the TUI owns the terminal
    pub file: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            ninja_binary: None,
            build_dir: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            max_messages_per_tick: 256,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| NinjaviewError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("ninjaview").join("config.toml"))
    }

    /// Load configuration, preferring an explicit path over the default
    /// location
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(NinjaviewError::file_not_found(path));
                }
                let content = std::fs::read_to_string(path)?;
                Ok(toml::from_str(&content)?)
            }
            None => Self::load(),
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| NinjaviewError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset() -> Result<()> {
        let config = Self::default();
        config.save()
    }

    /// Initialize configuration file
    pub fn init(force: bool) -> Result<()> {
        let path = Self::config_path()?;

        if path.exists() && !force {
            return Err(NinjaviewError::Config(
                "Configuration file already exists. Use --force to overwrite.".into(),
            ));
        }

        let config = Self::default();
        config.save()
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "general.ninja_binary" => self
                .general
                .ninja_binary
                .as_ref()
                .map(|p| p.display().to_string()),
            "general.build_dir" => self
                .general
                .build_dir
                .as_ref()
                .map(|p| p.display().to_string()),

            "ui.tick_rate_ms" => Some(self.ui.tick_rate_ms.to_string()),
            "ui.max_messages_per_tick" => Some(self.ui.max_messages_per_tick.to_string()),

            "logging.level" => Some(self.logging.level.clone()),
            "logging.file" => self.logging.file.as_ref().map(|p| p.display().to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "general.ninja_binary" => {
                self.general.ninja_binary =
                    if value.is_empty() { None } else { Some(PathBuf::from(value)) };
            }
            "general.build_dir" => {
                self.general.build_dir =
                    if value.is_empty() { None } else { Some(PathBuf::from(value)) };
            }

            "ui.tick_rate_ms" => {
                self.ui.tick_rate_ms = value.parse().map_err(|_| {
                    NinjaviewError::Config("Invalid number for tick_rate_ms".into())
                })?;
            }
            "ui.max_messages_per_tick" => {
                self.ui.max_messages_per_tick = value.parse().map_err(|_| {
                    NinjaviewError::Config("Invalid number for max_messages_per_tick".into())
                })?;
            }

            "logging.level" => {
                self.logging.level = value.to_string();
            }
            "logging.file" => {
                self.logging.file =
                    if value.is_empty() { None } else { Some(PathBuf::from(value)) };
            }

            _ => {
                return Err(NinjaviewError::Config(format!(
                    "Unknown configuration key: {}",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Get the cache directory (default location for TUI log files)
    pub fn cache_dir(&self) -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("ninjaview")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert!(config.general.ninja_binary.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        config.set("general.ninja_binary", "/usr/bin/ninja").unwrap();
        assert_eq!(
            config.get("general.ninja_binary"),
            Some("/usr/bin/ninja".to_string())
        );

        config.set("ui.tick_rate_ms", "250").unwrap();
        assert_eq!(config.get("ui.tick_rate_ms"), Some("250".to_string()));
    }

    #[test]
    fn test_set_unknown_key() {
        let mut config = Config::default();
        assert!(config.set("nope.nothing", "1").is_err());
    }

    #[test]
    fn test_set_invalid_number() {
        let mut config = Config::default();
        assert!(config.set("ui.tick_rate_ms", "fast").is_err());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ui]\ntick_rate_ms = 50\nmax_messages_per_tick = 8").unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.ui.tick_rate_ms, 50);
        // Missing sections fall back to defaults
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = Config::load_from(Some(Path::new("/nonexistent/nv.toml"))).unwrap_err();
        assert!(matches!(err, NinjaviewError::FileNotFound { .. }));
    }
}

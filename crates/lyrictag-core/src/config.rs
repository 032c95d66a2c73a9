//! Configuration management for lyrictag

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use lyrictag_tagger::TagCapability;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub lyrics: LyricsConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Embed the line-timed form when both forms are available
    pub prefer_synced: bool,
    /// Write a `.srt` file next to each tagged track
    pub export_srt: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum files converted at once
    pub max_parallel: usize,
    /// Continue on error
    pub continue_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig { ffmpeg: None },
            lyrics: LyricsConfig {
                prefer_synced: true,
                export_srt: false,
            },
            batch: BatchConfig {
                max_parallel: 4,
                continue_on_error: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(default_config) = Self::default_path() {
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment, e.g. LYRICTAG_LYRICS__EXPORT_SRT=true
        figment = figment.merge(Env::prefixed("LYRICTAG_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/lyrictag/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lyrictag/config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.max_parallel == 0 {
            return Err(ConfigError::InvalidValue(
                "batch.max_parallel must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Decide once whether tags can be written, from the configured FFmpeg
    /// path or `PATH`.
    pub fn tag_capability(&self) -> TagCapability {
        TagCapability::detect(self.paths.ffmpeg.as_deref())
    }
}

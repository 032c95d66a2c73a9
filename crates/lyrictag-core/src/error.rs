//! Error types for lyrictag-core
//!
//! Lyrics conversion itself cannot fail; these cover configuration and the
//! file work around it.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LyricTagError>;

#[derive(Error, Debug)]
pub enum LyricTagError {
    #[error("Tag writing failed: {0}")]
    Tag(#[from] lyrictag_tagger::TagError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

//! Error types for tag writing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagError {
    #[error("Tag writing unavailable: {0}")]
    Unavailable(String),

    #[error("Audio file not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("FFmpeg tag writing failed with exit code: {0:?}")]
    FfmpegFailed(Option<i32>),

    #[error("ID3 tag writing failed: {0}")]
    Id3(#[from] lofty::error::LoftyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagError {
    /// Failures that only mean "no tags for this file", as opposed to a
    /// broken environment or a damaged file.
    pub fn is_skippable(&self) -> bool {
        matches!(self, TagError::Unavailable(_) | TagError::UnsupportedFormat(_))
    }
}

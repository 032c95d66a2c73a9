//! lyrictag-core: lyrics time-code conversion and track tagging pipeline

pub mod config;
pub mod error;
pub mod lyrics;
pub mod metadata;
pub mod pipeline;
pub mod quality;

pub use config::Config;
pub use error::{LyricTagError, Result};

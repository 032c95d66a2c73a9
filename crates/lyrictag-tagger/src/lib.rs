//! Audio tag writing bridge for lyrictag
//!
//! Tags are written by the external FFmpeg binary. Whether that binary is
//! around is decided once, as a [`TagCapability`], and handed to
//! [`TagWriter::new`]. Nothing else in lyrictag needs to know about it.
//!
//! MP3 files also get ID3v2 synchronized lyrics (SYLT), written with lofty
//! after FFmpeg is done.

mod error;
mod ffmpeg;
mod id3;

pub use error::TagError;

use ffmpeg::FfmpegTagger;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Tag keys understood by FFmpeg for both FLAC and MP3 output.
pub mod keys {
    pub const TITLE: &str = "title";
    pub const ARTIST: &str = "artist";
    pub const ALBUM_ARTIST: &str = "album_artist";
    pub const ALBUM: &str = "album";
    pub const TRACK: &str = "track";
    pub const GENRE: &str = "genre";
    pub const LYRICS: &str = "lyrics";
}

/// Whether tags can be written in this environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCapability {
    Available { ffmpeg: PathBuf },
    Unavailable { reason: String },
}

impl TagCapability {
    /// Use the configured FFmpeg binary, or look one up in `PATH`.
    pub fn detect(configured: Option<&Path>) -> Self {
        match configured {
            Some(path) if path.exists() => TagCapability::Available {
                ffmpeg: path.to_path_buf(),
            },
            Some(path) => TagCapability::Unavailable {
                reason: format!("configured ffmpeg not found: {}", path.display()),
            },
            None => match which::which("ffmpeg") {
                Ok(ffmpeg) => TagCapability::Available { ffmpeg },
                Err(_) => TagCapability::Unavailable {
                    reason: "ffmpeg not found in PATH".to_string(),
                },
            },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TagCapability::Available { .. })
    }
}

/// Audio containers we know how to tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Flac,
    Mp3,
}

impl Container {
    /// Pick the container from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, TagError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "flac" => Ok(Container::Flac),
            "mp3" => Ok(Container::Mp3),
            other => Err(TagError::UnsupportedFormat(format!(".{}", other))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Container::Flac => "flac",
            Container::Mp3 => "mp3",
        }
    }
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Container::Flac => write!(f, "FLAC"),
            Container::Mp3 => write!(f, "MP3"),
        }
    }
}

/// Timed lyric lines for ID3v2 synchronized lyrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncedLyrics {
    /// `(start_ms, text)` in display order
    pub lines: Vec<(u32, String)>,
    /// Line-timed text the lines came from
    pub lrc: String,
}

/// Ordered tag fields. Setting a key twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    fields: Vec<(String, String)>,
    synced_lyrics: Option<SyncedLyrics>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(field) => field.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Only used for MP3 output, other containers ignore it.
    pub fn set_synced_lyrics(&mut self, lyrics: SyncedLyrics) {
        self.synced_lyrics = Some(lyrics);
    }

    pub fn synced_lyrics(&self) -> Option<&SyncedLyrics> {
        self.synced_lyrics.as_ref()
    }

    /// Number of plain text fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.synced_lyrics.is_none()
    }
}

/// Writes tags into audio files
#[derive(Debug)]
pub struct TagWriter {
    capability: TagCapability,
}

impl TagWriter {
    pub fn new(capability: TagCapability) -> Self {
        Self { capability }
    }

    pub fn capability(&self) -> &TagCapability {
        &self.capability
    }

    /// Replace the tags of `audio` with `tags`, optionally embedding `cover`
    /// as the front cover image.
    pub async fn write(
        &self,
        audio: &Path,
        tags: &TagSet,
        cover: Option<&Path>,
    ) -> Result<Container, TagError> {
        if !audio.exists() {
            return Err(TagError::FileNotFound(audio.display().to_string()));
        }

        let container = Container::from_path(audio)?;

        let ffmpeg = match &self.capability {
            TagCapability::Available { ffmpeg } => ffmpeg,
            TagCapability::Unavailable { reason } => {
                return Err(TagError::Unavailable(reason.clone()));
            }
        };

        let cover = cover.filter(|c| {
            let exists = c.exists();
            if !exists {
                warn!("Cover image not found, writing tags without it: {}", c.display());
            }
            exists
        });

        debug!("Tagging {} file via {}", container, ffmpeg.display());
        FfmpegTagger::new(ffmpeg.clone())
            .write(audio, container, tags, cover)
            .await?;

        let synced = tags
            .synced_lyrics()
            .filter(|l| container == Container::Mp3 && !l.lines.is_empty());
        if let Some(lyrics) = synced {
            self.write_synced_lyrics(audio, lyrics).await;
        }

        Ok(container)
    }

    /// Failures are logged only. The FFmpeg tags stay in place.
    async fn write_synced_lyrics(&self, audio: &Path, lyrics: &SyncedLyrics) {
        let path = audio.to_path_buf();
        let lyrics = lyrics.clone();
        let result = tokio::task::spawn_blocking(move || id3::embed_synced_lyrics(&path, &lyrics))
            .await
            .map_err(|e| TagError::Io(std::io::Error::other(e)))
            .and_then(|r| r);

        match result {
            Ok(()) => info!("Synchronized lyrics embedded in {}", audio.display()),
            Err(e) => warn!("Synchronized lyrics not embedded in {}: {}", audio.display(), e),
        }
    }
}

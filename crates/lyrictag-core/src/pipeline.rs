//! Per-track lyrics and tag processing

use crate::config::LyricsConfig;
use crate::error::LyricTagError;
use crate::lyrics::{self, LyricsEntry, LyricsKind};
use crate::metadata::{select_lyrics, TrackMetadata};

use lyrictag_tagger::{Container, SyncedLyrics, TagError, TagWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One track to process
#[derive(Debug, Clone)]
pub struct TrackJob {
    pub audio: PathBuf,
    pub metadata: TrackMetadata,
    /// Lyrics as received, plain or line-timed
    pub lyrics: Option<String>,
    /// Front cover image already on disk
    pub cover: Option<PathBuf>,
}

/// Pipeline progress stages
#[derive(Debug, Clone)]
pub enum PipelineStage {
    PreparingLyrics,
    WritingTags { container: String },
    ExportingSubtitles,
    Complete { duration: Duration },
    Failed { stage: String, error: String },
}

/// What happened to one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOutcome {
    pub lyrics_kind: Option<LyricsKind>,
    /// Number of timed entries in the lyrics (0 for plain lyrics)
    pub entry_count: usize,
    pub tags_written: bool,
    pub subtitle_path: Option<PathBuf>,
}

/// Tagging pipeline for single tracks.
///
/// The [`TagWriter`] is shared, so one pipeline can be cloned across
/// concurrent jobs.
#[derive(Clone)]
pub struct TrackPipeline {
    writer: Arc<TagWriter>,
    options: LyricsConfig,
    progress_tx: mpsc::Sender<PipelineStage>,
}

impl TrackPipeline {
    pub fn new(
        writer: Arc<TagWriter>,
        options: LyricsConfig,
        progress_tx: mpsc::Sender<PipelineStage>,
    ) -> Self {
        Self {
            writer,
            options,
            progress_tx,
        }
    }

    pub async fn run(&self, job: &TrackJob) -> Result<TrackOutcome, LyricTagError> {
        let start_time = Instant::now();
        info!("Processing: {}", job.audio.display());

        // 1. Lyrics
        let _ = self.progress_tx.send(PipelineStage::PreparingLyrics).await;

        let split = lyrics::classify_and_split(job.lyrics.as_deref());
        let synced = split
            .synced
            .as_deref()
            .map(|text| synced_lyrics(text, &lyrics::to_entries(text)));
        let entry_count = synced.as_ref().map_or(0, |s| s.lines.len());
        match split.kind() {
            Some(kind) => debug!("Lyrics: {:?}, {} timed entries", kind, entry_count),
            None => debug!("No lyrics for {}", job.audio.display()),
        }

        // 2. Tags
        let container_label = Container::from_path(&job.audio)
            .map(|c| c.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let _ = self.progress_tx.send(PipelineStage::WritingTags {
            container: container_label,
        }).await;

        let embedded = select_lyrics(&split, self.options.prefer_synced);
        let tags_written = match self.write_tags(job, embedded, synced).await {
            Ok(()) => true,
            Err(e) if e.is_skippable() => {
                warn!("Tags not written for {}: {}", job.audio.display(), e);
                false
            }
            Err(e) => {
                let _ = self.progress_tx.try_send(PipelineStage::Failed {
                    stage: "tags".to_string(),
                    error: e.to_string(),
                });
                return Err(e.into());
            }
        };

        // 3. Sidecar subtitles
        let subtitle_path = match split.synced.as_deref() {
            Some(synced) if self.options.export_srt => {
                let _ = self.progress_tx.send(PipelineStage::ExportingSubtitles).await;
                export_subtitles(synced, &subtitle_path_for(&job.audio))
                    .await
                    .map_err(|e| {
                        let _ = self.progress_tx.try_send(PipelineStage::Failed {
                            stage: "subtitles".to_string(),
                            error: e.to_string(),
                        });
                        e
                    })?
            }
            _ => None,
        };

        let duration = start_time.elapsed();
        info!("Done: {} ({:.1}s)", job.audio.display(), duration.as_secs_f32());

        let _ = self.progress_tx.send(PipelineStage::Complete { duration }).await;

        Ok(TrackOutcome {
            lyrics_kind: split.kind(),
            entry_count,
            tags_written,
            subtitle_path,
        })
    }

    async fn write_tags(
        &self,
        job: &TrackJob,
        lyrics: Option<&str>,
        synced: Option<SyncedLyrics>,
    ) -> Result<(), TagError> {
        let container = Container::from_path(&job.audio)?;
        let mut tags = job.metadata.to_tag_set(container, lyrics);
        if let Some(synced) = synced.filter(|_| container == Container::Mp3) {
            tags.set_synced_lyrics(synced);
        }
        self.writer
            .write(&job.audio, &tags, job.cover.as_deref())
            .await?;
        Ok(())
    }
}

/// Timed lines for an ID3v2 synchronized lyrics frame. Start times past the
/// frame's 32-bit range are clamped.
pub fn synced_lyrics(line_timed: &str, entries: &[LyricsEntry]) -> SyncedLyrics {
    SyncedLyrics {
        lines: entries
            .iter()
            .map(|e| {
                let start = u32::try_from(e.start_time_ms).unwrap_or(u32::MAX);
                (start, e.text.clone())
            })
            .collect(),
        lrc: line_timed.to_string(),
    }
}

/// `song.flac` -> `song.srt`
pub fn subtitle_path_for(audio: &Path) -> PathBuf {
    audio.with_extension("srt")
}

/// Write line-timed lyrics as a SubRip file. Returns `None`, writing nothing,
/// when the lyrics hold no time tags.
pub async fn export_subtitles(
    line_timed: &str,
    output: &Path,
) -> Result<Option<PathBuf>, LyricTagError> {
    let srt = lyrics::to_subtitle_text(line_timed);
    if srt.is_empty() {
        debug!("No timed entries, skipping {}", output.display());
        return Ok(None);
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, srt).await?;

    debug!("Subtitles written to: {}", output.display());
    Ok(Some(output.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyrictag_tagger::TagCapability;

    fn pipeline(export_srt: bool) -> (TrackPipeline, mpsc::Receiver<PipelineStage>) {
        let (tx, rx) = mpsc::channel(32);
        let writer = Arc::new(TagWriter::new(TagCapability::Unavailable {
            reason: "no ffmpeg in tests".to_string(),
        }));
        let options = LyricsConfig {
            prefer_synced: true,
            export_srt,
        };
        (TrackPipeline::new(writer, options, tx), rx)
    }

    fn job(audio: PathBuf, lyrics: Option<&str>) -> TrackJob {
        TrackJob {
            audio,
            metadata: TrackMetadata::default(),
            lyrics: lyrics.map(String::from),
            cover: None,
        }
    }

    #[test]
    fn test_subtitle_path_for() {
        assert_eq!(
            subtitle_path_for(Path::new("/music/a/song.flac")),
            PathBuf::from("/music/a/song.srt")
        );
    }

    #[test]
    fn test_synced_lyrics_from_entries() {
        let text = "[00:05.00]World\n[00:01.50]Hello\n[00:02.00]";
        let synced = synced_lyrics(text, &lyrics::to_entries(text));

        assert_eq!(
            synced.lines,
            [
                (1050, "Hello".to_string()),
                (2000, lyrics::PLACEHOLDER_TEXT.to_string()),
                (5000, "World".to_string()),
            ]
        );
        assert_eq!(synced.lrc, text);
    }

    #[test]
    fn test_synced_lyrics_clamps_start_times() {
        let entries = [LyricsEntry {
            start_time_ms: u64::from(u32::MAX) + 1,
            text: "late".to_string(),
        }];
        assert_eq!(synced_lyrics("", &entries).lines, [(u32::MAX, "late".to_string())]);
    }

    #[tokio::test]
    async fn test_export_subtitles_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested/song.srt");

        let written = export_subtitles("[00:01.50]Hello\n[00:05.00]World", &output)
            .await
            .unwrap();

        assert_eq!(written.as_deref(), Some(output.as_path()));
        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.starts_with("1\n00:00:01,050 --> 00:00:04,500\nHello\n\n2\n"));
    }

    #[tokio::test]
    async fn test_export_subtitles_skips_untimed_text() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("song.srt");

        assert_eq!(export_subtitles("no tags", &output).await.unwrap(), None);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_run_without_capability_still_exports() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("song.flac");
        std::fs::write(&audio, b"not really flac").unwrap();

        let (pipeline, mut rx) = pipeline(true);
        let outcome = pipeline
            .run(&job(audio.clone(), Some("[0:01.5]Hi\n[00:03]There")))
            .await
            .unwrap();

        assert_eq!(outcome.lyrics_kind, Some(LyricsKind::LineTimed));
        assert_eq!(outcome.entry_count, 2);
        assert!(!outcome.tags_written);
        assert_eq!(outcome.subtitle_path, Some(dir.path().join("song.srt")));

        drop(pipeline);
        let mut stages = Vec::new();
        while let Some(stage) = rx.recv().await {
            stages.push(stage);
        }
        assert!(matches!(stages.first(), Some(PipelineStage::PreparingLyrics)));
        assert!(matches!(stages.last(), Some(PipelineStage::Complete { .. })));
    }

    #[tokio::test]
    async fn test_run_plain_lyrics_has_no_subtitles() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("song.mp3");
        std::fs::write(&audio, b"").unwrap();

        let (pipeline, _rx) = pipeline(true);
        let outcome = pipeline
            .run(&job(audio, Some("Just words")))
            .await
            .unwrap();

        assert_eq!(outcome.lyrics_kind, Some(LyricsKind::Plain));
        assert_eq!(outcome.entry_count, 0);
        assert_eq!(outcome.subtitle_path, None);
    }

    #[tokio::test]
    async fn test_run_unsupported_container_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("song.ogg");
        std::fs::write(&audio, b"").unwrap();

        let (pipeline, _rx) = pipeline(false);
        let outcome = pipeline.run(&job(audio, None)).await.unwrap();

        assert_eq!(outcome.lyrics_kind, None);
        assert!(!outcome.tags_written);
    }

    #[tokio::test]
    async fn test_run_missing_audio_fails() {
        let (pipeline, _rx) = pipeline(false);
        let result = pipeline
            .run(&job(PathBuf::from("/nonexistent/song.flac"), None))
            .await;

        assert!(matches!(
            result,
            Err(LyricTagError::Tag(TagError::FileNotFound(_)))
        ));
    }
}

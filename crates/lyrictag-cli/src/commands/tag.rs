use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::read_input;
use crate::args::TagOptions;
use lyrictag_core::{
    config::Config,
    metadata::TrackMetadata,
    pipeline::{PipelineStage, TrackJob, TrackPipeline},
};
use lyrictag_tagger::TagWriter;

pub async fn run(audio: &Path, options: &TagOptions, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    let metadata = build_metadata(options).await?;
    let lyrics = match &options.lyrics {
        Some(path) => Some(read_input(path).await?),
        None => None,
    };

    let mut lyrics_options = config.lyrics.clone();
    lyrics_options.export_srt |= options.srt;
    if options.plain {
        lyrics_options.prefer_synced = false;
    }

    let job = TrackJob {
        audio: audio.to_path_buf(),
        metadata,
        lyrics,
        cover: options.cover.clone(),
    };

    // Create progress channel
    let (tx, mut rx) = mpsc::channel(32);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {msg}",
        )?
        .progress_chars("=>-"),
    );

    // Spawn progress handler
    let progress_handle = tokio::spawn(async move {
        while let Some(stage) = rx.recv().await {
            match stage {
                PipelineStage::PreparingLyrics => {
                    pb.set_position(10);
                    pb.set_message("Preparing lyrics...");
                }
                PipelineStage::WritingTags { container } => {
                    pb.set_position(40);
                    pb.set_message(format!("Writing {} tags...", container));
                }
                PipelineStage::ExportingSubtitles => {
                    pb.set_position(80);
                    pb.set_message("Exporting subtitles...");
                }
                PipelineStage::Complete { duration } => {
                    pb.set_position(100);
                    pb.finish_with_message(format!("Done ({:.1}s)", duration.as_secs_f32()));
                }
                PipelineStage::Failed { stage, error } => {
                    pb.abandon_with_message(format!("Failed at {}: {}", stage, error));
                }
            }
        }
    });

    let writer = Arc::new(TagWriter::new(config.tag_capability()));
    let pipeline = TrackPipeline::new(writer, lyrics_options, tx);
    let result = pipeline.run(&job).await;

    // Close the channel so the progress handler finishes
    drop(pipeline);
    progress_handle.await?;

    let outcome = result?;

    println!();
    match outcome.lyrics_kind {
        Some(kind) => println!("Lyrics:    {:?} ({} timed entries)", kind, outcome.entry_count),
        None => println!("Lyrics:    none"),
    }
    println!(
        "Tags:      {}",
        if outcome.tags_written { "written" } else { "skipped" }
    );
    if let Some(path) = outcome.subtitle_path {
        println!("Subtitles: {}", path.display());
    }

    Ok(())
}

async fn build_metadata(options: &TagOptions) -> Result<TrackMetadata> {
    let mut metadata = match &options.metadata {
        Some(path) => {
            let json = read_input(path).await?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid metadata JSON in {}", path.display()))?
        }
        None => TrackMetadata::default(),
    };

    if let Some(title) = &options.title {
        metadata.title = Some(title.clone());
    }
    if !options.artists.is_empty() {
        metadata.artists = options.artists.clone();
    }
    if let Some(album) = &options.album {
        metadata.album = Some(album.clone());
    }
    if let Some(position) = options.position {
        metadata.position = Some(position);
    }
    if !options.genres.is_empty() {
        metadata.genres = options.genres.clone();
    }
    if let Some(credits) = &options.credits {
        metadata.credits = Some(credits.clone());
    }

    Ok(metadata)
}

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::read_input;
use lyrictag_core::lyrics::{self, LyricsKind};

pub async fn split(input: &Path, plain_out: Option<&Path>, lrc_out: Option<&Path>) -> Result<()> {
    let raw = read_input(input).await?;
    let split = lyrics::classify_and_split(Some(&raw));

    let kind = match split.kind() {
        Some(LyricsKind::LineTimed) => "line-timed",
        Some(LyricsKind::Plain) => "plain",
        None => {
            println!("No lyrics found");
            return Ok(());
        }
    };
    println!("Format: {}", kind);

    if let Some(plain) = &split.plain {
        emit("plain", plain, plain_out).await?;
    }
    if let Some(synced) = &split.synced {
        emit("synced", synced, lrc_out).await?;
    }

    Ok(())
}

pub async fn entries(input: &Path, json: bool) -> Result<()> {
    let raw = read_input(input).await?;
    let entries = lyrics::to_entries(&lyrics::normalize(&raw));

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No timed entries");
        return Ok(());
    }

    for entry in &entries {
        println!("{}  {}", lyrics::format_srt_time(entry.start_time_ms), entry.text);
    }
    println!("\n{} entries", entries.len());

    Ok(())
}

pub async fn srt(input: &Path, output: Option<&Path>) -> Result<()> {
    let raw = read_input(input).await?;
    let srt = lyrics::to_subtitle_text(&lyrics::normalize(&raw));

    if srt.is_empty() {
        anyhow::bail!("No timed lyrics in {}", input.display());
    }

    match output {
        Some(path) => {
            tokio::fs::write(path, &srt)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Subtitles written to: {}", path.display());
        }
        None => print!("{}", srt),
    }

    Ok(())
}

async fn emit(label: &str, text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, text)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("[{}] written to {}", label, path.display());
        }
        None => println!("\n[{}]\n{}", label, text),
    }
    Ok(())
}

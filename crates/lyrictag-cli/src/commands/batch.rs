use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;

use lyrictag_core::{config::Config, lyrics, pipeline::export_subtitles};

const LYRICS_EXTENSIONS: [&str; 2] = ["lrc", "txt"];

enum Converted {
    Written(PathBuf),
    NoTimedLyrics,
}

pub async fn run(
    input: &Path,
    parallel: Option<usize>,
    output_dir: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let parallel = parallel.unwrap_or(config.batch.max_parallel).max(1);

    let files = collect_inputs(input).await?;

    if files.is_empty() {
        println!("No lyrics files found in {}", input.display());
        return Ok(());
    }

    let total = files.len();
    println!("Converting {} files with {} parallel workers\n", total, parallel);

    let semaphore = Arc::new(Semaphore::new(parallel));
    let multi = MultiProgress::new();

    let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {msg}")?.tick_chars("=>-");

    let results: Vec<_> = stream::iter(files.into_iter().enumerate())
        .map(|(idx, file)| {
            let sem = semaphore.clone();
            let pb = multi.add(ProgressBar::new_spinner());
            pb.set_style(spinner_style.clone());
            let output = output_path(&file, output_dir);

            async move {
                let result = match sem.acquire().await {
                    Ok(_permit) => {
                        pb.set_message(format!("[{}/{}] {}", idx + 1, total, file.display()));
                        pb.enable_steady_tick(std::time::Duration::from_millis(100));
                        convert_file(&file, &output).await
                    }
                    Err(e) => Err(e.into()),
                };

                let status = match &result {
                    Ok(Converted::Written(path)) => format!(
                        "Done: {}",
                        path.file_name().unwrap_or_default().to_string_lossy()
                    ),
                    Ok(Converted::NoTimedLyrics) => "Skipped: no timed lyrics".to_string(),
                    Err(e) => format!("Failed: {}", e),
                };
                pb.finish_with_message(format!("[{}/{}] {}", idx + 1, total, status));

                (file, result)
            }
        })
        .buffer_unordered(parallel)
        .collect()
        .await;

    // Summary
    let written = results
        .iter()
        .filter(|(_, r)| matches!(r, Ok(Converted::Written(_))))
        .count();
    let skipped = results
        .iter()
        .filter(|(_, r)| matches!(r, Ok(Converted::NoTimedLyrics)))
        .count();
    let failed: Vec<_> = results.iter().filter(|(_, r)| r.is_err()).collect();

    println!("\n=== Batch Complete ===");
    println!("Converted: {}", written);
    println!("Skipped:   {}", skipped);
    println!("Failed:    {}", failed.len());

    if !failed.is_empty() {
        println!("\nFailed files:");
        for (file, result) in &failed {
            if let Err(e) = result {
                println!("  {} - {}", file.display(), e);
            }
        }

        if !config.batch.continue_on_error {
            anyhow::bail!("{} of {} files failed", failed.len(), total);
        }
    }

    Ok(())
}

async fn convert_file(input: &Path, output: &Path) -> Result<Converted> {
    let raw = fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let written = export_subtitles(&lyrics::normalize(&raw), output).await?;
    Ok(written.map_or(Converted::NoTimedLyrics, Converted::Written))
}

/// A directory yields its lyrics files, any other file is read as a list of
/// paths (blank lines and `#` comments ignored).
async fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    if metadata.is_dir() {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(input).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_lyrics_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        return Ok(files);
    }

    let content = fs::read_to_string(input)
        .await
        .context("Failed to read input file")?;

    Ok(content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}

fn is_lyrics_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|e| LYRICS_EXTENSIONS.contains(&e.as_str()))
}

fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let srt = input.with_extension("srt");
    match (output_dir, srt.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => srt,
    }
}

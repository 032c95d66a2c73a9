use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::warn;

use super::read_input;
use crate::args::QualityArg;
use lyrictag_core::quality::{
    estimate_file_size, format_quality_report, Quality, QualityAvailability,
};

pub fn estimate(duration: u64, quality: QualityArg) -> Result<()> {
    let quality = match quality {
        QualityArg::Flac => Quality::Flac,
        QualityArg::High => Quality::High,
        QualityArg::Mid => Quality::Mid,
    };

    println!(
        "{} ({} {}): {} as {}",
        quality.to_string().to_uppercase(),
        quality.format_name(),
        quality.bitrate_label(),
        estimate_file_size(duration, quality),
        quality.file_extension()
    );

    Ok(())
}

pub async fn report(input: &Path, track_id: u64) -> Result<()> {
    let json = read_input(input).await?;
    let results = parse_results(&json)
        .with_context(|| format!("Invalid availability JSON in {}", input.display()))?;

    println!("{}", format_quality_report(track_id, &results));

    Ok(())
}

/// Availability results keyed by quality name, kept in input order. Keys that
/// name no known quality are skipped.
fn parse_results(json: &str) -> Result<Vec<(Quality, QualityAvailability)>> {
    let by_name: Map<String, Value> = serde_json::from_str(json)?;

    let mut results = Vec::with_capacity(by_name.len());
    for (name, value) in by_name {
        let Ok(quality) = name.parse::<Quality>() else {
            warn!("Skipping unknown quality: {}", name);
            continue;
        };
        let result = serde_json::from_value(value)
            .with_context(|| format!("Invalid result for {}", name))?;
        results.push((quality, result));
    }

    Ok(results)
}

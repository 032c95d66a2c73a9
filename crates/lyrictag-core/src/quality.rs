//! Stream quality tiers, size estimates and availability reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stream quality tiers, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// FLAC, lossless
    Flac,
    /// MP3 320 kbps
    High,
    /// MP3 128 kbps
    Mid,
}

impl Quality {
    /// All tiers in order of preference.
    pub const PREFERENCE: [Quality; 3] = [Quality::Flac, Quality::High, Quality::Mid];

    pub fn format_name(&self) -> &'static str {
        match self {
            Quality::Flac => "FLAC",
            Quality::High | Quality::Mid => "MP3",
        }
    }

    pub fn bitrate_label(&self) -> &'static str {
        match self {
            Quality::Flac => "Lossless",
            Quality::High => "320 kbps",
            Quality::Mid => "128 kbps",
        }
    }

    /// File extension including the dot.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Quality::Flac => ".flac",
            Quality::High | Quality::Mid => ".mp3",
        }
    }

    /// Rough average stream size
    fn bytes_per_second(&self) -> u64 {
        match self {
            Quality::Flac => 120_000,
            Quality::High => 40_000,
            Quality::Mid => 16_000,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Flac => write!(f, "flac"),
            Quality::High => write!(f, "high"),
            Quality::Mid => write!(f, "mid"),
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flac" => Ok(Quality::Flac),
            "high" => Ok(Quality::High),
            "mid" => Ok(Quality::Mid),
            other => Err(format!("unknown quality: {}", other)),
        }
    }
}

/// Human-readable size estimate, e.g. `~27.5 MB`.
pub fn estimate_file_size(duration_secs: u64, quality: Quality) -> String {
    let bytes = duration_secs.saturating_mul(quality.bytes_per_second());

    if bytes > 1024 * 1024 {
        format!("~{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("~{:.1} KB", bytes as f64 / 1024.0)
    }
}

/// When a stream link stops working: epoch milliseconds or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expiry {
    Millis(i64),
    Text(String),
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = match self {
            Expiry::Millis(ms) => Some(*ms),
            Expiry::Text(text) if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) => {
                text.parse().ok()
            }
            Expiry::Text(_) => None,
        };

        match (millis.and_then(DateTime::<Utc>::from_timestamp_millis), self) {
            (Some(at), _) => write!(f, "valid until {} UTC", at.format("%d.%m.%Y %H:%M")),
            (None, Expiry::Text(text)) => write!(f, "until {}", text),
            (None, Expiry::Millis(ms)) => write!(f, "until {}", ms),
        }
    }
}

/// Result of probing one quality tier for a track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityAvailability {
    pub available: bool,
    pub stream_url: Option<String>,
    pub expires: Option<Expiry>,
    pub error: Option<String>,
}

/// First available tier in preference order.
pub fn best_available(results: &[(Quality, QualityAvailability)]) -> Option<Quality> {
    Quality::PREFERENCE.into_iter().find(|quality| {
        results
            .iter()
            .any(|(q, result)| q == quality && result.available)
    })
}

/// Multi-line summary of which tiers a track can be fetched in.
pub fn format_quality_report(track_id: u64, results: &[(Quality, QualityAvailability)]) -> String {
    let mut report = vec![
        format!("Available qualities for track {}:", track_id),
        "=".repeat(50),
    ];

    for (quality, result) in results {
        let label = quality.to_string().to_uppercase();
        if result.available {
            let expiry = result
                .expires
                .as_ref()
                .map(|e| format!(" ({})", e))
                .unwrap_or_default();
            report.push(format!(
                "  {}: available - {} {}{}",
                label,
                quality.format_name(),
                quality.bitrate_label(),
                expiry
            ));
        } else {
            report.push(format!(
                "  {}: unavailable - {}",
                label,
                result.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    report.push(String::new());
    match best_available(results) {
        Some(best) => report.push(format!("Recommended quality: {}", best.to_string().to_uppercase())),
        None => report.push("No qualities available".to_string()),
    }

    report.join("\n")
}

//! Conversions from line-timed lyrics to plain text, timed entries and SubRip

use super::split_lines;
use super::timestamp::{Timestamp, LEADING_TAG, TIME_TAG};
use serde::Serialize;
use std::fmt;

/// Text used for timed lines that carry no words (instrumental breaks).
pub const PLACEHOLDER_TEXT: &str = "♪";

/// A subtitle ends this long before the next one starts...
pub const END_GAP_MS: u64 = 500;
/// ...but is shown for at least this long.
pub const MIN_DISPLAY_MS: u64 = 500;
/// Display time of the final subtitle.
pub const LAST_DISPLAY_MS: u64 = 4000;

/// One timed lyric line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricsEntry {
    pub start_time_ms: u64,
    pub text: String,
}

/// One SubRip cue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleBlock {
    /// 1-based sequence number
    pub index: usize,
    pub start_time_ms: u64,
    pub end_time_ms: u64,
    pub text: String,
}

impl SubtitleBlock {
    pub fn duration_ms(&self) -> u64 {
        self.end_time_ms.saturating_sub(self.start_time_ms)
    }
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            format_srt_time(self.start_time_ms),
            format_srt_time(self.end_time_ms)
        )?;
        writeln!(f, "{}", self.text)
    }
}

/// Strip one leading bracket group from every line. Tags further into a line
/// are left alone.
pub fn to_plain(text: &str) -> String {
    split_lines(text)
        .into_iter()
        .map(|line| LEADING_TAG.replace(line, ""))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collect one entry per time tag, sorted by start time.
///
/// A line with several tags yields several entries sharing the same text.
/// Lines without tags are skipped. Entries with equal start times keep their
/// input order.
pub fn to_entries(text: &str) -> Vec<LyricsEntry> {
    let mut entries = Vec::new();

    for line in split_lines(text) {
        if line.trim().is_empty() {
            continue;
        }

        let stamps: Vec<Timestamp> = TIME_TAG
            .captures_iter(line)
            .map(|caps| Timestamp::from_captures(&caps))
            .collect();
        if stamps.is_empty() {
            continue;
        }

        let stripped = TIME_TAG.replace_all(line, "");
        let words = match stripped.trim() {
            "" => PLACEHOLDER_TEXT,
            words => words,
        };

        entries.extend(stamps.into_iter().map(|ts| LyricsEntry {
            start_time_ms: ts.to_millis(),
            text: words.to_string(),
        }));
    }

    entries.sort_by_key(|e| e.start_time_ms);
    entries
}

/// Turn sorted entries into cues with synthesized end times.
///
/// Each cue ends [`END_GAP_MS`] before the next one starts, but never sooner
/// than [`MIN_DISPLAY_MS`] after its own start. The last cue lasts
/// [`LAST_DISPLAY_MS`].
pub fn to_subtitles(entries: &[LyricsEntry]) -> Vec<SubtitleBlock> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let start = entry.start_time_ms;
            let end = match entries.get(i + 1) {
                Some(next) => {
                    (start + MIN_DISPLAY_MS).max(next.start_time_ms.saturating_sub(END_GAP_MS))
                }
                None => start + LAST_DISPLAY_MS,
            };
            SubtitleBlock {
                index: i + 1,
                start_time_ms: start,
                end_time_ms: end,
                text: entry.text.clone(),
            }
        })
        .collect()
}

/// Render line-timed lyrics as a SubRip document. Empty when the text holds
/// no time tags.
pub fn to_subtitle_text(text: &str) -> String {
    to_subtitles(&to_entries(text))
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format milliseconds as a SubRip timestamp (`HH:MM:SS,mmm`).
pub fn format_srt_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

//! Lyrics format detection, time tag normalization and conversion
//!
//! Raw lyrics arrive either as plain text or as line-timed text with
//! `[mm:ss.ff]` tags. Line-timed text is normalized first and then converted
//! to plain text, timed entries or SubRip cues. Everything here is a pure
//! function of its input and never fails.

mod convert;
mod normalize;
mod timestamp;

pub use convert::{
    format_srt_time, to_entries, to_plain, to_subtitle_text, to_subtitles, LyricsEntry,
    SubtitleBlock, END_GAP_MS, LAST_DISPLAY_MS, MIN_DISPLAY_MS, PLACEHOLDER_TEXT,
};
pub use normalize::normalize;
pub use timestamp::Timestamp;

use timestamp::TIME_TAG_LOOSE;
use tracing::debug;

/// Shape of a raw lyrics blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsKind {
    /// Contains at least one `[mm:ss]`-style time tag
    LineTimed,
    Plain,
}

/// Classify raw lyrics by looking for any time tag.
pub fn detect(raw: &str) -> LyricsKind {
    if TIME_TAG_LOOSE.is_match(raw) {
        LyricsKind::LineTimed
    } else {
        LyricsKind::Plain
    }
}

/// Characters that end a line, in addition to `\r\n` as a pair.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split text into lines on every Unicode line boundary, not only `\n`.
///
/// A trailing line break does not produce a final empty line.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(LINE_BREAKS) {
        lines.push(&rest[..pos]);
        let brk = &rest[pos..];
        let len = if brk.starts_with("\r\n") {
            2
        } else {
            brk.chars().next().map_or(1, char::len_utf8)
        };
        rest = &rest[pos + len..];
    }

    if !rest.is_empty() {
        lines.push(rest);
    }
    lines
}

/// The forms derived from one raw lyrics blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricsSplit {
    /// Lyrics without time tags
    pub plain: Option<String>,
    /// Normalized line-timed lyrics, only for line-timed input
    pub synced: Option<String>,
}

impl LyricsSplit {
    /// No lyrics at all.
    pub fn is_empty(&self) -> bool {
        self.plain.is_none() && self.synced.is_none()
    }

    pub fn kind(&self) -> Option<LyricsKind> {
        match (&self.plain, &self.synced) {
            (_, Some(_)) => Some(LyricsKind::LineTimed),
            (Some(_), None) => Some(LyricsKind::Plain),
            (None, None) => None,
        }
    }
}

/// Split raw lyrics into plain and line-timed forms.
///
/// Missing or empty input yields neither. Plain input is passed through as the
/// plain form. Line-timed input is normalized, and the plain form is derived
/// from the normalized text.
pub fn classify_and_split(raw: Option<&str>) -> LyricsSplit {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return LyricsSplit::default(),
    };

    match detect(raw) {
        LyricsKind::LineTimed => {
            let synced = normalize(raw);
            let plain = to_plain(&synced);
            debug!("Detected line-timed lyrics ({} lines)", split_lines(&synced).len());
            LyricsSplit {
                plain: Some(plain),
                synced: Some(synced),
            }
        }
        LyricsKind::Plain => {
            debug!("Detected plain lyrics");
            LyricsSplit {
                plain: Some(raw.to_string()),
                synced: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(detect("[00:01.50]Hello"), LyricsKind::LineTimed);
        assert_eq!(detect("intro\nthen [1:02] later"), LyricsKind::LineTimed);
        assert_eq!(detect("[ 01:02:3 ]x"), LyricsKind::LineTimed);
        assert_eq!(detect("Just words"), LyricsKind::Plain);
        assert_eq!(detect("[ar:Artist]\n[1:2]x"), LyricsKind::Plain);
        assert_eq!(detect(""), LyricsKind::Plain);
    }

    #[test]
    fn test_split_lines_on_unicode_breaks() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), ["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\u{2028}b\x0bc\x0cd\u{85}e"), ["a", "b", "c", "d", "e"]);
        assert_eq!(split_lines("a\n\nb\n"), ["a", "", "b"]);
        assert_eq!(split_lines("\u{2028}x"), ["", "x"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_split_empty_input() {
        assert!(classify_and_split(None).is_empty());
        assert!(classify_and_split(Some("")).is_empty());
        assert_eq!(classify_and_split(None).kind(), None);
    }

    #[test]
    fn test_split_plain_input_passes_through() {
        let raw = "\nFirst line\nSecond line\n";
        let split = classify_and_split(Some(raw));
        assert_eq!(split.plain.as_deref(), Some(raw));
        assert_eq!(split.synced, None);
        assert_eq!(split.kind(), Some(LyricsKind::Plain));
    }

    #[test]
    fn test_split_line_timed_input() {
        let split = classify_and_split(Some("\n[0:01.5]Hello\n[00:05]World\n\n"));
        assert_eq!(split.synced.as_deref(), Some("[00:01.05]Hello\n[00:05.00]World"));
        assert_eq!(split.plain.as_deref(), Some("Hello\nWorld"));
        assert_eq!(split.kind(), Some(LyricsKind::LineTimed));
    }

    #[test]
    fn test_split_then_convert() {
        let split = classify_and_split(Some("[00:01.50]Hello\n[00:05.00]World"));
        let synced = split.synced.unwrap();
        assert_eq!(to_entries(&synced).len(), 2);
        assert!(to_subtitle_text(&synced).starts_with("1\n00:00:01,050 --> 00:00:04,500\n"));
    }

    #[test]
    fn test_types_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LyricsSplit>();
        assert_send_sync::<LyricsEntry>();
        assert_send_sync::<SubtitleBlock>();
    }
}

//! Synchronized lyrics frames for MP3, which FFmpeg cannot write

use crate::{SyncedLyrics, TagError};
use lofty::id3::v2::{
    Frame, FrameFlags, FrameValue, Id3v2Tag, SyncTextContentType, SynchronizedText,
    TimestampFormat, UnsynchronizedTextFrame,
};
use lofty::mpeg::MpegFile;
use lofty::{AudioFile, ParseOptions, TagExt, TextEncoding};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// ISO 639-2 code for "unknown language"
const LANGUAGE: [u8; 3] = *b"XXX";

/// Description of the USLT frame carrying the LRC text
pub(crate) const LRC_DESCRIPTION: &str = "LRC";

/// Add a SYLT frame with the timed lines and a USLT frame with the LRC text
/// to the ID3v2 tag of `audio`, keeping every frame already there.
pub(crate) fn embed_synced_lyrics(audio: &Path, lyrics: &SyncedLyrics) -> Result<(), TagError> {
    let mut file = File::open(audio)?;
    let mpeg = MpegFile::read_from(&mut file, ParseOptions::new().read_properties(false))?;
    drop(file);

    let mut tag = mpeg.id3v2().cloned().unwrap_or_else(Id3v2Tag::new);

    let sylt = SynchronizedText {
        encoding: TextEncoding::UTF8,
        language: LANGUAGE,
        timestamp_format: TimestampFormat::MS,
        content_type: SyncTextContentType::Lyrics,
        description: None,
        content: lyrics.lines.clone(),
    };
    tag.insert(Frame::new(
        "SYLT",
        FrameValue::Binary(sylt.as_bytes()?),
        FrameFlags::default(),
    )?);

    let uslt = UnsynchronizedTextFrame {
        encoding: TextEncoding::UTF8,
        language: LANGUAGE,
        description: LRC_DESCRIPTION.to_string(),
        content: lyrics.lrc.clone(),
    };
    tag.insert(Frame::new(
        "USLT",
        FrameValue::UnsynchronizedText(uslt),
        FrameFlags::default(),
    )?);

    tag.save_to_path(audio)?;

    debug!(
        "Embedded {} synchronized lines in {}",
        lyrics.lines.len(),
        audio.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofty::Accessor;
    use std::io::Write;

    /// MPEG-1 Layer III, 128 kbps, 44.1 kHz, no padding
    const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
    const FRAME_LEN: usize = 417;

    fn silent_mp3() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        let mut frame = vec![0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&FRAME_HEADER);
        for _ in 0..8 {
            file.write_all(&frame).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn read_tag(path: &Path) -> Id3v2Tag {
        let mut file = File::open(path).unwrap();
        let mpeg =
            MpegFile::read_from(&mut file, ParseOptions::new().read_properties(false)).unwrap();
        mpeg.id3v2().cloned().expect("ID3v2 tag written")
    }

    fn lyrics() -> SyncedLyrics {
        SyncedLyrics {
            lines: vec![(1050, "Hello".to_string()), (5000, "World".to_string())],
            lrc: "[00:01.05]Hello\n[00:05.00]World".to_string(),
        }
    }

    #[test]
    fn test_synced_lines_round_trip() {
        let mp3 = silent_mp3();
        embed_synced_lyrics(mp3.path(), &lyrics()).unwrap();

        let tag = read_tag(mp3.path());
        let sylt = tag
            .into_iter()
            .find(|frame| frame.id_str() == "SYLT")
            .expect("SYLT frame");
        let FrameValue::Binary(bytes) = sylt.content() else {
            panic!("SYLT kept as raw frame data");
        };
        let parsed = SynchronizedText::parse(bytes).unwrap();

        assert_eq!(parsed.timestamp_format, TimestampFormat::MS);
        assert_eq!(parsed.content_type, SyncTextContentType::Lyrics);
        assert_eq!(parsed.content, lyrics().lines);
    }

    #[test]
    fn test_lrc_text_frame_is_written() {
        let mp3 = silent_mp3();
        embed_synced_lyrics(mp3.path(), &lyrics()).unwrap();

        let tag = read_tag(mp3.path());
        let lrc = tag.into_iter().find_map(|frame| match frame.content() {
            FrameValue::UnsynchronizedText(text) if text.description == LRC_DESCRIPTION => {
                Some(text.content.clone())
            }
            _ => None,
        });

        assert_eq!(lrc.as_deref(), Some("[00:01.05]Hello\n[00:05.00]World"));
    }

    #[test]
    fn test_existing_frames_are_kept() {
        let mp3 = silent_mp3();
        let mut tag = Id3v2Tag::new();
        tag.set_title("Song".to_string());
        tag.save_to_path(mp3.path()).unwrap();

        embed_synced_lyrics(mp3.path(), &lyrics()).unwrap();

        let tag = read_tag(mp3.path());
        assert_eq!(tag.title().as_deref(), Some("Song"));
        assert!(tag.into_iter().any(|frame| frame.id_str() == "SYLT"));
    }
}

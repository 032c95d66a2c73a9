//! Track metadata and the tags derived from it

use crate::lyrics::LyricsSplit;
use lyrictag_tagger::{keys, Container, TagSet};
use serde::{Deserialize, Deserializer, Serialize};

/// Descriptive metadata for one track, as supplied by the catalogue.
///
/// Empty strings and a zero position count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackMetadata {
    pub title: Option<String>,
    #[serde(alias = "artist_names")]
    pub artists: Vec<String>,
    #[serde(alias = "release_title")]
    pub album: Option<String>,
    /// Number or numeric string, `"3"` and `"3/12"` both read as 3
    #[serde(deserialize_with = "deserialize_position")]
    pub position: Option<u32>,
    pub genres: Vec<String>,
    pub credits: Option<String>,
}

impl TrackMetadata {
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str).filter(|a| !a.is_empty())
    }

    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(String::as_str).filter(|g| !g.is_empty())
    }

    /// Tags to write for this track.
    ///
    /// The first artist doubles as album artist. For FLAC the credits, when
    /// present, take over the album artist field.
    pub fn to_tag_set(&self, container: Container, lyrics: Option<&str>) -> TagSet {
        let mut tags = TagSet::new();

        if let Some(title) = non_empty(&self.title) {
            tags.set(keys::TITLE, title);
        }

        if let Some(artist) = self.primary_artist() {
            tags.set(keys::ARTIST, artist);
            tags.set(keys::ALBUM_ARTIST, artist);
        }

        if let Some(album) = non_empty(&self.album) {
            tags.set(keys::ALBUM, album);
        }

        if let Some(position) = self.position.filter(|p| *p > 0) {
            tags.set(keys::TRACK, position.to_string());
        }

        if let Some(genre) = self.primary_genre() {
            tags.set(keys::GENRE, genre);
        }

        if container == Container::Flac {
            if let Some(credits) = non_empty(&self.credits) {
                tags.set(keys::ALBUM_ARTIST, credits);
            }
        }

        if let Some(lyrics) = lyrics.filter(|l| !l.is_empty()) {
            tags.set(keys::LYRICS, lyrics);
        }

        tags
    }
}

/// Pick which lyrics form to embed. Falls back to the other form when the
/// preferred one is missing.
pub fn select_lyrics(split: &LyricsSplit, prefer_synced: bool) -> Option<&str> {
    let synced = split.synced.as_deref();
    let plain = split.plain.as_deref();
    if prefer_synced {
        synced.or(plain)
    } else {
        plain.or(synced)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PositionValue {
    Number(u32),
    Text(String),
}

/// Catalogues send the track number either way. Text that is not a number
/// counts as missing.
fn deserialize_position<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<PositionValue>::deserialize(deserializer)? {
        Some(PositionValue::Number(n)) => Some(n),
        Some(PositionValue::Text(text)) => {
            let number = text.split('/').next().unwrap_or_default().trim();
            number.parse().ok()
        }
        None => None,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::classify_and_split;

    fn sample() -> TrackMetadata {
        TrackMetadata {
            title: Some("Song".to_string()),
            artists: vec!["First".to_string(), "Second".to_string()],
            album: Some("Record".to_string()),
            position: Some(3),
            genres: vec!["Rock".to_string(), "Pop".to_string()],
            credits: Some("Produced by X".to_string()),
        }
    }

    #[test]
    fn test_flac_tags_use_credits_as_album_artist() {
        let tags = sample().to_tag_set(Container::Flac, Some("words"));
        assert_eq!(tags.get(keys::TITLE), Some("Song"));
        assert_eq!(tags.get(keys::ARTIST), Some("First"));
        assert_eq!(tags.get(keys::ALBUM_ARTIST), Some("Produced by X"));
        assert_eq!(tags.get(keys::ALBUM), Some("Record"));
        assert_eq!(tags.get(keys::TRACK), Some("3"));
        assert_eq!(tags.get(keys::GENRE), Some("Rock"));
        assert_eq!(tags.get(keys::LYRICS), Some("words"));
    }

    #[test]
    fn test_mp3_tags_ignore_credits() {
        let tags = sample().to_tag_set(Container::Mp3, None);
        assert_eq!(tags.get(keys::ALBUM_ARTIST), Some("First"));
        assert_eq!(tags.get(keys::LYRICS), None);
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let metadata = TrackMetadata {
            title: Some(String::new()),
            position: Some(0),
            ..Default::default()
        };
        assert!(metadata.to_tag_set(Container::Flac, Some("")).is_empty());
    }

    #[test]
    fn test_deserialize_catalogue_names() {
        let json = r#"{
            "title": "Song",
            "artist_names": ["First"],
            "release_title": "Record",
            "position": 7
        }"#;
        let metadata: TrackMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.primary_artist(), Some("First"));
        assert_eq!(metadata.album.as_deref(), Some("Record"));
        assert_eq!(metadata.position, Some(7));
        assert!(metadata.genres.is_empty());
    }

    #[test]
    fn test_deserialize_position_as_text() {
        let position = |json: &str| serde_json::from_str::<TrackMetadata>(json).unwrap().position;

        assert_eq!(position(r#"{"position": "3"}"#), Some(3));
        assert_eq!(position(r#"{"position": " 4/12 "}"#), Some(4));
        assert_eq!(position(r#"{"position": "A1"}"#), None);
        assert_eq!(position(r#"{"position": null}"#), None);
        assert_eq!(position("{}"), None);

        let tags = serde_json::from_str::<TrackMetadata>(r#"{"position": "5"}"#)
            .unwrap()
            .to_tag_set(Container::Mp3, None);
        assert_eq!(tags.get(keys::TRACK), Some("5"));
    }

    #[test]
    fn test_select_lyrics() {
        let timed = classify_and_split(Some("[00:01.00]Hi"));
        assert_eq!(select_lyrics(&timed, true), Some("[00:01.00]Hi"));
        assert_eq!(select_lyrics(&timed, false), Some("Hi"));

        let plain = classify_and_split(Some("Hi"));
        assert_eq!(select_lyrics(&plain, true), Some("Hi"));

        assert_eq!(select_lyrics(&classify_and_split(None), true), None);
    }
}

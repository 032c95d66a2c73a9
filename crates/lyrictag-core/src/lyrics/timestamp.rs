//! Time tags of the `[mm:ss.ff]` line-timed lyrics format

use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

/// Any time tag the detector and normalizer accept, e.g. `[1:02]`, `[ 01:02.3 ]`
/// or `[01:02:03]`.
#[allow(clippy::expect_used)]
pub(crate) static TIME_TAG_LOOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*[0-9]{1,2}:[0-9]{2}(?:[.:][0-9]{1,2})?\s*\]")
        .expect("valid regex: TIME_TAG_LOOSE")
});

/// Time tags as read by entry extraction. No inner whitespace.
#[allow(clippy::expect_used)]
pub(crate) static TIME_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([0-9]{1,2}):([0-9]{2})(?:[.:]([0-9]{1,2}))?\]")
        .expect("valid regex: TIME_TAG")
});

/// A single bracket group at the start of a line, plus surrounding whitespace.
#[allow(clippy::expect_used)]
pub(crate) static LEADING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[[^\]]+\]\s*").expect("valid regex: LEADING_TAG")
});

/// Position inside a track as carried by a lyrics time tag.
///
/// `fractional` is nominally hundredths of a second, but see [`Timestamp::to_millis`]
/// for how it is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub minutes: u32,
    pub seconds: u32,
    pub fractional: u32,
}

impl Timestamp {
    pub fn new(minutes: u32, seconds: u32, fractional: u32) -> Self {
        Self {
            minutes,
            seconds,
            fractional,
        }
    }

    /// Parse the text of a time tag, brackets included or not.
    ///
    /// The contents are split on `:` and `.`. Missing or non-numeric minutes and
    /// seconds become 0. A third numeric part is the fractional value, clamped
    /// to 0..=99.
    pub fn parse_bracket(token: &str) -> Self {
        let inner = token.replace(['[', ']'], "");
        let parts: Vec<&str> = inner.trim().split([':', '.']).collect();

        let minutes = parts.first().and_then(|p| parse_digits(p)).unwrap_or(0);
        let seconds = parts.get(1).and_then(|p| parse_digits(p)).unwrap_or(0);
        let fractional = parts
            .get(2)
            .and_then(|p| parse_digits(p))
            .map(|ff| ff.min(99))
            .unwrap_or(0);

        Self::new(minutes, seconds, fractional)
    }

    /// Build from a [`TIME_TAG`] match.
    pub(crate) fn from_captures(caps: &Captures<'_>) -> Self {
        let field = |idx: usize| {
            caps.get(idx)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0)
        };
        Self::new(field(1), field(2), field(3))
    }

    /// Offset from the start of the track in milliseconds.
    ///
    /// A fractional value below 10 is read as tenths (`5` -> 50 ms), one in
    /// 10..100 is taken as-is, and anything larger contributes nothing. So
    /// `.5`, `.05` and `.50` all land on 50 ms. Tagging consumers already rely
    /// on these values, keep them.
    pub fn to_millis(&self) -> u64 {
        let fraction_ms = match self.fractional {
            ff if ff < 10 => ff * 10,
            ff if ff < 100 => ff,
            _ => 0,
        };
        (u64::from(self.minutes) * 60 + u64::from(self.seconds)) * 1000 + u64::from(fraction_ms)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:02}:{:02}.{:02}]",
            self.minutes, self.seconds, self.fractional
        )
    }
}

fn parse_digits(part: &str) -> Option<u32> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bracket_without_fraction() {
        let ts = Timestamp::parse_bracket("[0:5]");
        assert_eq!(ts, Timestamp::new(0, 5, 0));
        assert_eq!(ts.to_string(), "[00:05.00]");
    }

    #[test]
    fn test_parse_bracket_variants() {
        assert_eq!(Timestamp::parse_bracket("[ 01:02.3 ]"), Timestamp::new(1, 2, 3));
        assert_eq!(Timestamp::parse_bracket("[01:02:45]"), Timestamp::new(1, 2, 45));
        assert_eq!(Timestamp::parse_bracket("12:34.56"), Timestamp::new(12, 34, 56));
    }

    #[test]
    fn test_parse_bracket_defaults_bad_fields_to_zero() {
        assert_eq!(Timestamp::parse_bracket("[ar:Artist]"), Timestamp::new(0, 0, 0));
        assert_eq!(Timestamp::parse_bracket("[]"), Timestamp::new(0, 0, 0));
        assert_eq!(Timestamp::parse_bracket("[03:x.7]"), Timestamp::new(3, 0, 7));
    }

    #[test]
    fn test_parse_bracket_clamps_fraction() {
        assert_eq!(Timestamp::parse_bracket("[00:01.999]").fractional, 99);
    }

    #[test]
    fn test_to_millis_scaling() {
        assert_eq!(Timestamp::new(0, 1, 5).to_millis(), 1050);
        assert_eq!(Timestamp::new(0, 1, 50).to_millis(), 1050);
        assert_eq!(Timestamp::new(0, 1, 99).to_millis(), 1099);
        assert_eq!(Timestamp::new(2, 3, 0).to_millis(), 123_000);
        // Out-of-range fractions are dropped rather than rejected
        assert_eq!(Timestamp::new(0, 1, 150).to_millis(), 1000);
    }

    #[test]
    fn test_display_pads_fields() {
        assert_eq!(Timestamp::new(3, 7, 1).to_string(), "[03:07.01]");
    }

    #[test]
    fn test_time_tag_captures() {
        let caps = TIME_TAG.captures("[01:02.3]line").unwrap();
        assert_eq!(Timestamp::from_captures(&caps), Timestamp::new(1, 2, 3));

        let caps = TIME_TAG.captures("[01:02]line").unwrap();
        assert_eq!(Timestamp::from_captures(&caps), Timestamp::new(1, 2, 0));
    }

    #[test]
    fn test_loose_tag_allows_inner_whitespace() {
        assert!(TIME_TAG_LOOSE.is_match("[ 1:02.30 ]"));
        assert!(!TIME_TAG_LOOSE.is_match("[1:2]"));
        assert!(!TIME_TAG.is_match("[ 1:02.30 ]"));
    }
}

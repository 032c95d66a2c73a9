//! Canonicalize time tags to `[mm:ss.ff]`

use super::split_lines;
use super::timestamp::{Timestamp, TIME_TAG_LOOSE};
use regex::Captures;
use std::borrow::Cow;

/// Rewrite the first time tag of every line to `[MM:SS.FF]` and drop blank
/// lines at the start and end of the text. Interior blank lines are kept.
///
/// Running it again on its own output changes nothing.
pub fn normalize(raw: &str) -> String {
    let lines: Vec<Cow<'_, str>> = split_lines(raw).into_iter().map(normalize_line).collect();

    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return String::new();
    };
    let last = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(first);

    lines[first..=last].join("\n")
}

fn normalize_line(line: &str) -> Cow<'_, str> {
    TIME_TAG_LOOSE.replacen(line, 1, |caps: &Captures<'_>| {
        Timestamp::parse_bracket(&caps[0]).to_string()
    })
}

//! Point segmentation.
//!
//! Recovers an ordered, de-duplicated list of source points from noisy
//! marked-up text: numbered markers, private-use-area glyph bullets (an
//! artifact of some layout extractors), standard bullet glyphs, and wrapped
//! continuation lines.

use std::{collections::HashSet, num::NonZeroUsize, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;

/// A single semantic unit extracted from source text.
///
/// Points are created once per document by [`segment`], are unique by exact
/// text within one segmentation, and carry a stable 1-based ordinal in
/// document order. They are immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    text: NonEmptyString,
    ordinal: NonZeroUsize,
}

impl Point {
    /// The trimmed, whitespace-normalized text of the point.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// The 1-based position of the point in the document.
    #[must_use]
    pub const fn ordinal(&self) -> NonZeroUsize {
        self.ordinal
    }
}

/// The marker family that introduced an item-start line.
///
/// The three families are independent predicates checked in a
/// precedence-free OR; a document may mix them freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// A decimal marker: `1.`, `2)` or `(3)` followed by whitespace.
    Numbered,
    /// A short run of private-use-area glyphs (U+E000..U+F8FF) followed by
    /// whitespace. Some layout extractors render bullet glyphs this way.
    PuaGlyph,
    /// A standard bullet glyph (`•`, `◦`, `▪`, `‣`, hyphen, en/em dash)
    /// followed by whitespace.
    Bullet,
}

static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+\.|\d+\)|\(\d+\))\s+").expect("valid pattern"));
static PUA_GLYPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[\x{E000}-\x{F8FF}]{1,10}\s+").expect("valid pattern"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[•◦▪‣\-–—]\s+").expect("valid pattern"));

/// Header/footer artifacts erroneously captured by marker matching.
static ARTIFACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnumbered\s+list\b").expect("valid pattern"));

static LINE_ENDINGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n?|\x{2028}").expect("valid pattern"));

impl Marker {
    /// Classifies a line as an item-start line, returning the matching
    /// marker family.
    #[must_use]
    pub fn classify(line: &str) -> Option<Self> {
        if NUMBERED.is_match(line) {
            Some(Self::Numbered)
        } else if PUA_GLYPH.is_match(line) {
            Some(Self::PuaGlyph)
        } else if BULLET.is_match(line) {
            Some(Self::Bullet)
        } else {
            None
        }
    }

    fn strip(self, line: &str) -> String {
        let pattern = match self {
            Self::Numbered => &NUMBERED,
            Self::PuaGlyph => &PUA_GLYPH,
            Self::Bullet => &BULLET,
        };
        pattern.replace(line, "").trim().to_string()
    }
}

/// Error returned when segmentation is required to produce at least one
/// point.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("no points recovered from input text")]
pub struct NoPoints;

/// Segments raw document text into an ordered sequence of unique points.
///
/// Line endings are normalized, each line is classified against the three
/// marker families, and non-blank lines between markers are joined onto the
/// current point with single spaces (reassembling points that wrap across
/// source lines). Exact duplicates collapse to their first occurrence, empty
/// entries and known extraction artifacts are dropped, and ordinals are
/// assigned over the final sequence.
///
/// An empty result is not an error here; use [`segment_non_empty`] where
/// zero points must be surfaced to the caller.
#[must_use]
pub fn segment(text: &str) -> Vec<Point> {
    let normalized = LINE_ENDINGS.replace_all(text, "\n");

    let mut raw_points: Vec<String> = Vec::new();
    // `Some` while inside a point, even if no content has accumulated yet
    // (a marker with an empty remainder opens a point whose first content is
    // the next continuation line).
    let mut current: Option<Vec<String>> = None;

    for line in normalized.split('\n') {
        if let Some(marker) = Marker::classify(line) {
            if let Some(fragments) = current.take() {
                raw_points.push(fragments.join(" ").trim().to_string());
            }
            let remainder = marker.strip(line);
            let mut fragments = Vec::new();
            if !remainder.is_empty() {
                fragments.push(remainder);
            }
            current = Some(fragments);
        } else if let Some(fragments) = current.as_mut() {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                fragments.push(trimmed.to_string());
            }
        }
    }
    if let Some(fragments) = current {
        raw_points.push(fragments.join(" ").trim().to_string());
    }

    let mut seen = HashSet::new();
    raw_points
        .into_iter()
        .filter(|text| !text.is_empty() && !ARTIFACT.is_match(text))
        .filter(|text| seen.insert(text.clone()))
        .zip(1..)
        .filter_map(|(text, ordinal)| {
            let text = NonEmptyString::new(text).ok()?;
            let ordinal = NonZeroUsize::new(ordinal)?;
            Some(Point { text, ordinal })
        })
        .collect()
}

/// Segments raw document text, treating an empty result as an error.
///
/// # Errors
///
/// Returns [`NoPoints`] if no points were recovered from the text.
pub fn segment_non_empty(text: &str) -> Result<Vec<Point>, NoPoints> {
    let points = segment(text);
    if points.is_empty() {
        Err(NoPoints)
    } else {
        Ok(points)
    }
}

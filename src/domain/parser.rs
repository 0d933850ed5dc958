//! Recovery of discrete labeled items from raw generator output.
//!
//! Two shapes are recognized: delimiter-separated items (one generation call
//! returning several items in a single pass) and paragraph-block items
//! (aggregating already-labeled items from a persisted questions file).

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

/// The sentinel line that separates items in delimiter-separated output.
pub const ITEM_SENTINEL: &str = "---";

/// Matches the label prefix on the first line of a paragraph block:
/// one-to-many digits, an optional single letter, a period, whitespace.
static LABEL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(\d+[a-z]?)\.\s").expect("valid pattern"));

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n){2,}").expect("valid pattern"));

/// Splits delimiter-separated generator output into at most `expected`
/// items.
///
/// Items are separated by a line containing only [`ITEM_SENTINEL`]. If the
/// sentinel split does not yield exactly `expected` non-empty segments, the
/// text is re-split on triple-newline boundaries; if that also fails to
/// produce the expected count, the leading segments found so far are
/// returned as-is. Missing items are never fabricated; excess items are
/// trimmed.
#[must_use]
pub fn split_expected(raw: &str, expected: usize) -> Vec<String> {
    let raw = raw.trim();

    let mut parts: Vec<String> = Vec::new();
    let mut buf: Vec<&str> = Vec::new();
    for line in raw.lines() {
        if line.trim() == ITEM_SENTINEL {
            if !buf.is_empty() {
                parts.push(buf.join("\n").trim().to_string());
                buf.clear();
            }
        } else {
            buf.push(line);
        }
    }
    if !buf.is_empty() {
        parts.push(buf.join("\n").trim().to_string());
    }
    parts.retain(|part| !part.is_empty());

    if parts.len() != expected {
        let candidates: Vec<String> = raw
            .split("\n\n\n")
            .map(str::trim)
            .filter(|blk| !blk.is_empty())
            .map(ToString::to_string)
            .collect();
        if candidates.len() == expected {
            parts = candidates;
        }
    }

    parts.truncate(expected);
    parts
}

/// Parses a paragraph-block questions document into a label → block-text
/// table.
///
/// Blocks are separated by two or more consecutive newlines. A candidate
/// block is an item only if its first non-blank line carries a label prefix
/// (e.g. `"12."`, `"12a."`); anything else (stray prose, headings) is
/// discarded. Labels are lower-cased for use as lookup keys; block text is
/// trimmed at the edges with internal line breaks preserved.
#[must_use]
pub fn parse_labeled_blocks(content: &str) -> HashMap<String, String> {
    let mut blocks = HashMap::new();
    let content = content.trim();
    if content.is_empty() {
        return blocks;
    }

    for candidate in PARAGRAPH_BREAK.split(content) {
        let Some(first_line) = candidate.lines().find(|line| !line.trim().is_empty()) else {
            continue;
        };
        let Some(captures) = LABEL_PREFIX.captures(first_line) else {
            continue;
        };
        let label = captures[1].to_lowercase();
        blocks.insert(label, candidate.trim().to_string());
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_split_with_expected_count() {
        let raw = "first item\nline two\n---\nsecond item\n---\nthird item";
        let parts = split_expected(raw, 3);
        assert_eq!(
            parts,
            ["first item\nline two", "second item", "third item"]
        );
    }

    #[test]
    fn excess_segments_are_trimmed_never_fabricated() {
        let raw = "a\n---\nb\n---\nc\n---\nd";
        let parts = split_expected(raw, 3);
        assert_eq!(parts, ["a", "b", "c"]);
    }

    #[test]
    fn fewer_segments_than_expected_are_returned_as_found() {
        let raw = "only\n---\ntwo";
        let parts = split_expected(raw, 3);
        assert_eq!(parts, ["only", "two"]);
    }

    #[test]
    fn triple_newline_fallback() {
        let raw = "first\n\n\nsecond\n\n\nthird";
        let parts = split_expected(raw, 3);
        assert_eq!(parts, ["first", "second", "third"]);
    }

    #[test]
    fn fallback_is_ignored_when_count_still_wrong() {
        // No sentinels and only two triple-newline segments: keep the single
        // sentinel-split segment rather than adopting a wrong-count fallback.
        let raw = "first\n\n\nsecond";
        let parts = split_expected(raw, 3);
        assert_eq!(parts, ["first\n\n\nsecond"]);
    }

    #[test]
    fn empty_segments_between_sentinels_are_dropped() {
        let raw = "---\n\n---\nreal\n---\n  \n---\nother";
        let parts = split_expected(raw, 2);
        assert_eq!(parts, ["real", "other"]);
    }

    #[test]
    fn paragraph_blocks_keyed_by_lowercased_label() {
        let content = "1A. Question one?\nA. x\nB. y\n\n1b. Question two?\nA. p\nB. q";
        let blocks = parse_labeled_blocks(content);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks["1a"], "1A. Question one?\nA. x\nB. y");
        assert_eq!(blocks["1b"], "1b. Question two?\nA. p\nB. q");
    }

    #[test]
    fn unlabeled_blocks_are_discarded() {
        let content = "Here are your questions:\n\n3. Real question?\nA. x\n\nGood luck!";
        let blocks = parse_labeled_blocks(content);
        assert_eq!(blocks.len(), 1);
        assert!(blocks.contains_key("3"));
    }

    #[test]
    fn internal_single_newlines_do_not_split_blocks() {
        let content = "2a. Question?\nA. one\nB. two\nAnswer: A";
        let blocks = parse_labeled_blocks(content);
        assert_eq!(blocks["2a"], content);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        assert!(parse_labeled_blocks("").is_empty());
        assert!(parse_labeled_blocks("\n\n\n").is_empty());
    }
}

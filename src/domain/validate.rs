//! Structural validation of labeled question blocks.
//!
//! Checks the shape the generator was asked for: four options lettered
//! `A.` through `D.`, an answer line naming one of them, and complete item
//! groups per point. Findings are collected rather than returned as errors
//! so a single malformed block never hides the rest of the report.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::ItemLabel;

static OPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*([A-D])\.\s*(\S[^\n]*)").unwrap());

static ANSWER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:\*\*)?\s*(?:correct\s+)?answer:\s*(.*?)\s*(?:\*\*)?\s*$").unwrap()
});

const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// The number of leading characters compared when checking that an answer's
/// text matches the option it names.
const SIMILARITY_PREFIX: usize = 20;

/// The findings from validating one run's blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// The number of blocks examined.
    pub checked: usize,
    /// Findings that make a block unusable.
    pub errors: Vec<String>,
    /// Findings worth a look but not fatal.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Whether the run passed with no errors (warnings are allowed).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "checked {} blocks", self.checked)?;
        for error in &self.errors {
            writeln!(f, "error: {error}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        Ok(())
    }
}

/// Validates a label → block table.
///
/// Blocks are checked in label order so the report is deterministic. Keys
/// that do not parse as labels are reported as errors and skipped;
/// `expected_items` is the number of items each point should have produced
/// (group-count mismatches are warnings, since a partially failed run is
/// still usable).
#[must_use]
pub fn validate_blocks(blocks: &HashMap<String, String>, expected_items: usize) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut labeled: Vec<(ItemLabel, &str)> = Vec::with_capacity(blocks.len());
    for (key, block) in blocks {
        match key.parse::<ItemLabel>() {
            Ok(label) => labeled.push((label, block)),
            Err(error) => report.errors.push(format!("unparseable label '{key}': {error}")),
        }
    }
    labeled.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

    let mut group_sizes: Vec<(usize, usize)> = Vec::new();
    for (label, block) in labeled {
        report.checked += 1;
        check_block(&label, block, &mut report);

        let ordinal = label.ordinal().get();
        match group_sizes.last_mut() {
            Some((last, count)) if *last == ordinal => *count += 1,
            _ => group_sizes.push((ordinal, 1)),
        }
    }

    for (ordinal, count) in group_sizes {
        if count != expected_items {
            report.warnings.push(format!(
                "point {ordinal}: expected {expected_items} items, found {count}"
            ));
        }
    }

    report
}

fn check_block(label: &ItemLabel, block: &str, report: &mut ValidationReport) {
    let mut options: HashMap<char, &str> = HashMap::new();
    for captures in OPTION_LINE.captures_iter(block) {
        let letter = captures[1].chars().next().unwrap_or_default();
        let text = captures.get(2).map_or("", |m| m.as_str());
        if options.insert(letter, text).is_some() {
            report.warnings.push(format!("{label}: duplicate option {letter}"));
        }
    }

    for letter in OPTION_LETTERS {
        if !options.contains_key(&letter) {
            report.errors.push(format!("{label}: missing option {letter}"));
        }
    }

    let Some(answer) = ANSWER_LINE
        .captures(block)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
    else {
        report.errors.push(format!("{label}: missing answer line"));
        return;
    };

    if answer.is_empty() {
        report.errors.push(format!("{label}: empty answer"));
        return;
    }

    let letter = answer
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or_default();
    if !OPTION_LETTERS.contains(&letter) {
        report
            .errors
            .push(format!("{label}: invalid answer letter '{letter}'"));
        return;
    }

    // When the answer repeats the option text, the prefixes should agree.
    let answer_text = answer[1..].trim_start_matches(['.', ')']).trim();
    if let Some(option_text) = options.get(&letter) {
        if !answer_text.is_empty() && !prefix_matches(answer_text, option_text) {
            report
                .warnings
                .push(format!("{label}: answer text differs from option {letter}"));
        }
    }
}

fn prefix_matches(a: &str, b: &str) -> bool {
    let head = |s: &str| {
        s.chars()
            .take(SIMILARITY_PREFIX)
            .flat_map(char::to_lowercase)
            .collect::<String>()
    };
    head(a) == head(b)
}

/// Compares answer letters between two runs' blocks, matched by label key.
///
/// Returns one message per label whose answers disagree, in label order.
/// Labels present in only one run are skipped; the structural checks in
/// [`validate_blocks`] already surface those.
#[must_use]
pub fn compare_answers(
    left: &HashMap<String, String>,
    right: &HashMap<String, String>,
) -> Vec<String> {
    let mut keys: Vec<(ItemLabel, &String)> = left
        .keys()
        .filter(|key| right.contains_key(*key))
        .filter_map(|key| key.parse::<ItemLabel>().ok().map(|label| (label, key)))
        .collect();
    keys.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

    let mut mismatches = Vec::new();
    for (label, key) in keys {
        let a = answer_letter(&left[key]);
        let b = answer_letter(&right[key]);
        if let (Some(a), Some(b)) = (a, b) {
            if a != b {
                mismatches.push(format!("{label}: {a} vs {b}"));
            }
        }
    }
    mismatches
}

fn answer_letter(block: &str) -> Option<char> {
    ANSWER_LINE
        .captures(block)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().trim().chars().next())
        .map(|c| c.to_ascii_uppercase())
}

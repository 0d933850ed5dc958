//! Per-point generation and label alignment.
//!
//! Drives a [`Generator`] over an ordered sequence of points, assigns
//! deterministic labels to the returned blocks, and records a
//! point-to-labels mapping alongside the labeled blocks themselves. Failure
//! is isolated per point: one point's failure never aborts the run.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ItemBlock, ItemLabel, Point};

/// A boxed error from an external generation source.
pub type GenerateError = Box<dyn std::error::Error + Send + Sync>;

/// An external source of generated item blocks.
///
/// Implementations own prompt construction, model selection, retries and
/// rate limiting entirely; this crate treats them as a black box that may
/// fail. Blocks are returned in emission order as raw text.
pub trait Generator {
    /// Generates one or more raw item blocks for a point.
    ///
    /// # Errors
    ///
    /// Returns an error if the external source fails; the failure is
    /// contained to this point by the caller.
    fn generate(&mut self, point: &Point) -> Result<Vec<String>, GenerateError>;
}

/// The labelling convention of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelMode {
    /// One item per point, labeled with the bare point ordinal (`"3"`).
    Single,
    /// Several items per point, labeled ordinal + letter (`"3a"`, `"3b"`).
    #[default]
    Lettered,
}

/// The outcome of processing one point.
///
/// Collected into a sequence rather than handled ad hoc, so the "one
/// point's failure never aborts the run" contract is explicit and testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointOutcome {
    /// The point yielded at least one non-empty block.
    Generated(Vec<ItemLabel>),
    /// Every candidate block was empty after trimming.
    Empty,
    /// The external call failed; the point is absent from the mapping.
    Failed(String),
}

/// An ordered mapping from point text to the labels its items received.
///
/// Only points that yielded at least one non-empty block have an entry;
/// entry order follows point order and label order follows emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointToLabelsMap {
    entries: Vec<(String, Vec<ItemLabel>)>,
}

impl PointToLabelsMap {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry. Callers are responsible for not inserting the same
    /// point text twice; lookups return the first entry.
    pub fn push(&mut self, point_text: String, labels: Vec<ItemLabel>) {
        self.entries.push((point_text, labels));
    }

    /// The labels recorded for a point, by exact text.
    #[must_use]
    pub fn labels_for(&self, point_text: &str) -> Option<&[ItemLabel]> {
        self.entries
            .iter()
            .find(|(text, _)| text == point_text)
            .map(|(_, labels)| labels.as_slice())
    }

    /// Iterates entries in insertion (point) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ItemLabel])> {
        self.entries
            .iter()
            .map(|(text, labels)| (text.as_str(), labels.as_slice()))
    }

    /// The number of points with at least one label.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The result of aligning one run: the point-to-labels mapping, the labeled
/// blocks in point-then-emission order, and the per-point outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunAlignment {
    /// Point text → labels, in point order.
    pub map: PointToLabelsMap,
    /// Labeled blocks, preserving point order and emission order within a
    /// point.
    pub blocks: Vec<ItemBlock>,
    /// One outcome per input point, in point order.
    pub outcomes: Vec<PointOutcome>,
}

/// Aligns generated items to their originating points.
///
/// For each point in order, calls the generator, discards blocks that are
/// empty after trimming, assigns the next label (bare ordinal in
/// [`LabelMode::Single`], ordinal + sequential letter in
/// [`LabelMode::Lettered`]), rewrites each block's first line with its
/// label, and records the mapping entry.
///
/// Generation failures are logged and skipped; the point is simply absent
/// from the mapping and the run continues.
pub fn align(
    points: &[Point],
    generator: &mut dyn Generator,
    mode: LabelMode,
) -> RunAlignment {
    let mut map = PointToLabelsMap::new();
    let mut blocks = Vec::new();
    let mut outcomes = Vec::with_capacity(points.len());

    for point in points {
        let raw_blocks = match generator.generate(point) {
            Ok(raw_blocks) => raw_blocks,
            Err(error) => {
                warn!(ordinal = point.ordinal().get(), %error, "generation failed; skipping point");
                outcomes.push(PointOutcome::Failed(error.to_string()));
                continue;
            }
        };

        let mut assigned: Vec<ItemLabel> = Vec::new();
        for raw in &raw_blocks {
            let label = match mode {
                LabelMode::Single => ItemLabel::bare(point.ordinal()),
                LabelMode::Lettered => {
                    let Some(label) = ItemLabel::lettered(point.ordinal(), assigned.len()) else {
                        warn!(
                            ordinal = point.ordinal().get(),
                            "sub-letter range exhausted; dropping remaining blocks"
                        );
                        break;
                    };
                    label
                }
            };
            // Empty blocks are discarded without consuming a label slot:
            // the letter sequence advances only on surviving blocks.
            if let Some(block) = ItemBlock::labeled(label, raw) {
                assigned.push(block.label());
                blocks.push(block);
            }
        }

        if assigned.is_empty() {
            outcomes.push(PointOutcome::Empty);
        } else {
            map.push(point.text().to_string(), assigned.clone());
            outcomes.push(PointOutcome::Generated(assigned));
        }
    }

    RunAlignment {
        map,
        blocks,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::point::segment;

    /// Yields canned responses per point; fails on ordinals in `fail_on`.
    struct FakeGenerator {
        responses: Vec<Vec<String>>,
        fail_on: Vec<usize>,
        calls: usize,
    }

    impl FakeGenerator {
        fn new(responses: Vec<Vec<String>>) -> Self {
            Self {
                responses,
                fail_on: Vec::new(),
                calls: 0,
            }
        }
    }

    impl Generator for FakeGenerator {
        fn generate(&mut self, point: &Point) -> Result<Vec<String>, GenerateError> {
            self.calls += 1;
            if self.fail_on.contains(&point.ordinal().get()) {
                return Err("provider unavailable".into());
            }
            Ok(self
                .responses
                .get(point.ordinal().get() - 1)
                .cloned()
                .unwrap_or_default())
        }
    }

    fn three_points() -> Vec<Point> {
        segment("1. First\n2. Second\n3. Third")
    }

    #[test]
    fn lettered_labels_in_emission_order() {
        let points = segment("1. pad\n2. pad2\n3. pad3\n4. pad4\n5. Target");
        let mut generator = FakeGenerator::new(vec![
            vec![],
            vec![],
            vec![],
            vec![],
            vec!["q one".into(), "q two".into(), "q three".into()],
        ]);

        let result = align(&points, &mut generator, LabelMode::Lettered);

        let labels: Vec<String> = result
            .map
            .labels_for("Target")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, ["5a", "5b", "5c"]);

        for (block, expected) in result.blocks.iter().zip(["5a. ", "5b. ", "5c. "]) {
            assert!(block.text().starts_with(expected));
        }
    }

    #[test]
    fn single_mode_uses_bare_ordinals() {
        let points = three_points();
        let mut generator = FakeGenerator::new(vec![
            vec!["one".into()],
            vec!["two".into()],
            vec!["three".into()],
        ]);

        let result = align(&points, &mut generator, LabelMode::Single);

        assert_eq!(result.map.labels_for("Second").unwrap()[0].key(), "2");
        assert_eq!(result.blocks[2].text(), "3. three");
    }

    #[test]
    fn failure_is_isolated_per_point() {
        let points = three_points();
        let mut generator = FakeGenerator::new(vec![
            vec!["one".into()],
            vec!["two".into()],
            vec!["three".into()],
        ]);
        generator.fail_on = vec![2];

        let result = align(&points, &mut generator, LabelMode::Lettered);

        assert_eq!(result.map.len(), 2);
        assert!(result.map.labels_for("Second").is_none());
        assert_eq!(
            result.outcomes[1],
            PointOutcome::Failed("provider unavailable".to_string())
        );
        // The later point is still processed.
        assert!(result.map.labels_for("Third").is_some());
        assert_eq!(generator.calls, 3);
    }

    #[test]
    fn empty_blocks_do_not_consume_letters() {
        let points = segment("1. Only");
        let mut generator = FakeGenerator::new(vec![vec![
            "first".into(),
            "   ".into(),
            "third".into(),
        ]]);

        let result = align(&points, &mut generator, LabelMode::Lettered);

        let labels: Vec<String> = result
            .map
            .labels_for("Only")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        // The discarded middle block leaves no gap in the letter sequence.
        assert_eq!(labels, ["1a", "1b"]);
    }

    #[test]
    fn all_empty_blocks_leave_point_out_of_map() {
        let points = segment("1. Only");
        let mut generator = FakeGenerator::new(vec![vec!["  ".into(), String::new()]]);

        let result = align(&points, &mut generator, LabelMode::Lettered);

        assert!(result.map.is_empty());
        assert_eq!(result.outcomes, [PointOutcome::Empty]);
    }

    #[test]
    fn block_order_follows_points_then_emission() {
        let points = three_points();
        let mut generator = FakeGenerator::new(vec![
            vec!["1-first".into(), "1-second".into()],
            vec!["2-first".into()],
            vec!["3-first".into()],
        ]);

        let result = align(&points, &mut generator, LabelMode::Lettered);

        let keys: Vec<String> = result
            .blocks
            .iter()
            .map(|block| block.label().key())
            .collect();
        assert_eq!(keys, ["1a", "1b", "2a", "3a"]);
    }
}

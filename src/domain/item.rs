use super::ItemLabel;

/// The raw text of one generated item together with its assigned label.
///
/// The first non-blank line of the block is rewritten to begin with
/// `"<label>. "` so the persisted questions file is self-describing. A block
/// is never mutated after label assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBlock {
    label: ItemLabel,
    text: String,
}

impl ItemBlock {
    /// Labels a raw block, rewriting its first non-blank line with the label
    /// prefix.
    ///
    /// Returns `None` if the block is empty after trimming; empty candidates
    /// are discarded before they consume a label slot.
    #[must_use]
    pub fn labeled(label: ItemLabel, raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut lines: Vec<String> = trimmed.lines().map(ToString::to_string).collect();
        if let Some(first) = lines.iter_mut().find(|line| !line.trim().is_empty()) {
            *first = format!("{label}. {}", first.trim_start());
        }

        Some(Self {
            label,
            text: lines.join("\n"),
        })
    }

    /// The label assigned to this item.
    #[must_use]
    pub const fn label(&self) -> ItemLabel {
        self.label
    }

    /// The block text, first line prefixed with the label.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn label(s: &str) -> ItemLabel {
        s.parse().unwrap()
    }

    #[test]
    fn first_line_is_prefixed_with_label() {
        let block = ItemBlock::labeled(label("5a"), "What is inertia?\nA. a\nB. b").unwrap();
        assert_eq!(block.text(), "5a. What is inertia?\nA. a\nB. b");
        assert_eq!(block.label().ordinal(), NonZeroUsize::new(5).unwrap());
    }

    #[test]
    fn leading_whitespace_on_first_line_is_stripped() {
        let block = ItemBlock::labeled(label("2"), "   indented question\nbody").unwrap();
        assert_eq!(block.text(), "2. indented question\nbody");
    }

    #[test]
    fn internal_line_breaks_are_preserved() {
        let block = ItemBlock::labeled(label("1"), "q\nA. x\n\nAnswer: A").unwrap();
        assert_eq!(block.text(), "1. q\nA. x\n\nAnswer: A");
    }

    #[test]
    fn empty_block_is_discarded() {
        assert!(ItemBlock::labeled(label("1"), "").is_none());
        assert!(ItemBlock::labeled(label("1"), "  \n\t\n").is_none());
    }
}

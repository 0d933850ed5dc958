use std::{fmt, num::NonZeroUsize, str::FromStr};

/// The identifier of a single generated item.
///
/// Format: `{ORDINAL}{LETTER?}`, where:
/// - `ORDINAL` is the 1-based ordinal of the originating [`Point`]
/// - `LETTER` is an optional lowercase sub-letter, present when a point
///   yields more than one item in a run ("lettered" labelling)
///
/// Examples: `3` (single-item run), `3b` (second item of point 3).
///
/// Labels have a defined total order (ordinal first, bare before lettered)
/// and a canonical lowercase rendering used as the lookup key in persisted
/// label tables.
///
/// [`Point`]: crate::domain::Point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemLabel {
    ordinal: NonZeroUsize,
    letter: Option<char>,
}

impl ItemLabel {
    /// Create a bare label from a point ordinal (single-item convention).
    #[must_use]
    pub const fn bare(ordinal: NonZeroUsize) -> Self {
        Self {
            ordinal,
            letter: None,
        }
    }

    /// Create a lettered label from a point ordinal and a 0-based sub-index
    /// (multi-item convention: 0 → `a`, 1 → `b`, …).
    ///
    /// Returns `None` if the sub-index exceeds the letter range (`z`).
    #[must_use]
    pub fn lettered(ordinal: NonZeroUsize, sub_index: usize) -> Option<Self> {
        let sub_index = u8::try_from(sub_index).ok()?;
        if sub_index >= 26 {
            return None;
        }
        Some(Self {
            ordinal,
            letter: Some(char::from(b'a' + sub_index)),
        })
    }

    /// The ordinal of the originating point.
    #[must_use]
    pub const fn ordinal(&self) -> NonZeroUsize {
        self.ordinal
    }

    /// The sub-letter, if this label uses the multi-item convention.
    #[must_use]
    pub const fn letter(&self) -> Option<char> {
        self.letter
    }

    /// The canonical lowercase rendering, used as a lookup key.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ItemLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.letter {
            Some(letter) => write!(f, "{}{letter}", self.ordinal),
            None => write!(f, "{}", self.ordinal),
        }
    }
}

/// Errors that can occur when parsing an [`ItemLabel`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The string is not digits optionally followed by one letter.
    #[error("Invalid label format: '{0}'")]
    Syntax(String),

    /// The ordinal component is not a positive integer.
    #[error("Invalid ordinal in label '{0}': expected a non-zero integer")]
    Ordinal(String),
}

impl FromStr for ItemLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Syntax(s.to_string()));
        }

        // Split the trailing letter (if any) from the digits. Uppercase
        // letters are accepted and normalized to lowercase.
        let (digits, letter) = match s.char_indices().last() {
            Some((idx, c)) if c.is_ascii_alphabetic() => {
                (&s[..idx], Some(c.to_ascii_lowercase()))
            }
            _ => (s, None),
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::Syntax(s.to_string()));
        }

        let ordinal = digits
            .parse::<usize>()
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| Error::Ordinal(s.to_string()))?;

        Ok(Self { ordinal, letter })
    }
}

impl TryFrom<&str> for ItemLabel {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordinal(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn bare_label_renders_ordinal_only() {
        let label = ItemLabel::bare(ordinal(7));
        assert_eq!(label.to_string(), "7");
        assert_eq!(label.letter(), None);
    }

    #[test]
    fn lettered_labels_follow_emission_order() {
        let labels: Vec<String> = (0..3)
            .map(|i| ItemLabel::lettered(ordinal(5), i).unwrap().to_string())
            .collect();
        assert_eq!(labels, ["5a", "5b", "5c"]);
    }

    #[test]
    fn lettered_label_out_of_range() {
        assert!(ItemLabel::lettered(ordinal(1), 25).is_some());
        assert!(ItemLabel::lettered(ordinal(1), 26).is_none());
    }

    #[test]
    fn parse_bare() {
        let label: ItemLabel = "12".parse().unwrap();
        assert_eq!(label.ordinal().get(), 12);
        assert_eq!(label.letter(), None);
    }

    #[test]
    fn parse_lettered() {
        let label: ItemLabel = "12a".parse().unwrap();
        assert_eq!(label.ordinal().get(), 12);
        assert_eq!(label.letter(), Some('a'));
    }

    #[test]
    fn parse_normalizes_uppercase_letter() {
        let label: ItemLabel = "3B".parse().unwrap();
        assert_eq!(label.key(), "3b");
    }

    #[test]
    fn parse_rejects_zero_ordinal() {
        assert_eq!(
            "0a".parse::<ItemLabel>(),
            Err(Error::Ordinal("0a".to_string()))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!("".parse::<ItemLabel>(), Err(Error::Syntax(_))));
        assert!(matches!("abc".parse::<ItemLabel>(), Err(Error::Syntax(_))));
        assert!(matches!("1a2".parse::<ItemLabel>(), Err(Error::Syntax(_))));
        assert!(matches!("-3".parse::<ItemLabel>(), Err(Error::Syntax(_))));
    }

    #[test]
    fn total_order_is_ordinal_then_letter() {
        let mut labels = vec![
            "2a".parse::<ItemLabel>().unwrap(),
            "1b".parse::<ItemLabel>().unwrap(),
            "1".parse::<ItemLabel>().unwrap(),
            "1a".parse::<ItemLabel>().unwrap(),
        ];
        labels.sort();
        let rendered: Vec<String> = labels.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["1", "1a", "1b", "2a"]);
    }

    #[test]
    fn roundtrip() {
        let original = ItemLabel::lettered(ordinal(36), 2).unwrap();
        let parsed: ItemLabel = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }
}

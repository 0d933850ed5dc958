//! Domain models for the points-to-questions pipeline.
//!
//! This module contains the core domain types: points segmented from
//! source text, item labels, labeled question blocks, run alignment, and
//! the cross-run comparison table.

/// Point segmentation from marker-structured text.
pub mod point;
pub use point::{Marker, NoPoints, Point, segment, segment_non_empty};

/// Item labels (`"3"`, `"3b"`) and their ordering.
pub mod label;
pub use label::{Error as LabelError, ItemLabel};

mod item;
pub use item::ItemBlock;

/// Splitting and parsing raw generator output.
pub mod parser;
pub use parser::{ITEM_SENTINEL, parse_labeled_blocks, split_expected};

/// Aligning generated items back to their originating points.
pub mod alignment;
pub use alignment::{
    GenerateError, Generator, LabelMode, PointOutcome, PointToLabelsMap, RunAlignment, align,
};

/// Merging aligned runs into a comparison table.
pub mod comparison;
pub use comparison::{ComparisonRow, ComparisonTable, NO_DATA, Run};

mod config;
pub use config::Config;

/// Structural validation of labeled question blocks.
pub mod validate;
pub use validate::{ValidationReport, compare_answers, validate_blocks};

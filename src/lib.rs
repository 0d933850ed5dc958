//! Points-to-questions pipeline
//!
//! Segments marker-structured summary text into ordered points, aligns
//! generated question items back to those points, and merges runs into a
//! comparison table.

pub mod domain;
pub use domain::{
    ComparisonTable, Config, Generator, ItemBlock, ItemLabel, LabelMode, Point, PointToLabelsMap,
    Run, RunAlignment, ValidationReport,
};

/// Filesystem storage for runs and their mapping and questions files.
pub mod storage;
pub use storage::{RunStore, StoredRun};

/// The point-to-labels mapping file format.
pub mod mapping;
/// The labeled-questions file format.
pub mod questions;
mod run_store;

pub use run_store::{LoadError, RunStore, StoredRun};

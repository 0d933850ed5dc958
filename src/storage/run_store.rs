//! Run persistence: each run owns a mapping file and a questions file in a
//! shared directory, both named after the run.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
    domain::{ItemBlock, PointToLabelsMap, Run},
    storage::{mapping, questions},
};

const MAPPING_PREFIX: &str = "points_to_questions_";
const MAPPING_EXT: &str = ".md";
const QUESTIONS_PREFIX: &str = "summary_questions_";
const QUESTIONS_EXT: &str = ".txt";

/// Errors that can occur when loading a run.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Neither of the run's files exists.
    #[error("no files found for run '{0}'")]
    NotFound(String),
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The run's mapping file could not be parsed.
    #[error("mapping for run '{name}': {source}")]
    Mapping {
        /// The run name.
        name: String,
        /// The underlying mapping error.
        source: mapping::LoadError,
    },
}

/// A run as loaded from disk.
///
/// Either file may have been absent; the corresponding side is then empty
/// and the comparison layer falls back to label guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRun {
    /// The run name.
    pub name: String,
    /// Point text → labels, empty if the mapping file was absent.
    pub map: PointToLabelsMap,
    /// Label key → block text, empty if the questions file was absent.
    pub blocks: HashMap<String, String>,
}

impl From<StoredRun> for Run {
    fn from(stored: StoredRun) -> Self {
        Self::new(stored.name, stored.map, stored.blocks)
    }
}

/// A directory holding run files.
#[derive(Debug, Clone)]
pub struct RunStore {
    root: PathBuf,
}

impl RunStore {
    /// Creates a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn mapping_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{MAPPING_PREFIX}{name}{MAPPING_EXT}"))
    }

    fn questions_path(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{QUESTIONS_PREFIX}{name}{QUESTIONS_EXT}"))
    }

    /// Writes a run's mapping and questions files.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written.
    pub fn save_run(
        &self,
        name: &str,
        map: &PointToLabelsMap,
        blocks: &[ItemBlock],
    ) -> io::Result<()> {
        self.save_mapping(name, map)?;
        questions::save(&self.questions_path(name), blocks)
    }

    /// Writes only a run's mapping file, leaving the questions file alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_mapping(&self, name: &str, map: &PointToLabelsMap) -> io::Result<()> {
        mapping::save(&self.mapping_path(name), map)
    }

    /// Loads a run by name.
    ///
    /// A missing mapping or questions file is tolerated (the side loads
    /// empty); only when both are missing is the run reported as not
    /// found.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] when neither file exists, or another
    /// variant if a present file cannot be read or parsed.
    pub fn load_run(&self, name: &str) -> Result<StoredRun, LoadError> {
        let map = match mapping::load(&self.mapping_path(name)) {
            Ok(map) => Some(map),
            Err(mapping::LoadError::NotFound) => None,
            Err(source) => {
                return Err(LoadError::Mapping {
                    name: name.to_string(),
                    source,
                });
            }
        };

        let blocks = match questions::load(&self.questions_path(name)) {
            Ok(blocks) => Some(blocks),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => return Err(error.into()),
        };

        if map.is_none() && blocks.is_none() {
            return Err(LoadError::NotFound(name.to_string()));
        }

        Ok(StoredRun {
            name: name.to_string(),
            map: map.unwrap_or_default(),
            blocks: blocks.unwrap_or_default(),
        })
    }

    /// Lists the run names found in the store, sorted and deduplicated.
    ///
    /// A run is discovered if either of its files is present; unrelated
    /// files are ignored.
    #[must_use]
    pub fn discover_runs(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_str()?;
                run_name(file_name, MAPPING_PREFIX, MAPPING_EXT)
                    .or_else(|| run_name(file_name, QUESTIONS_PREFIX, QUESTIONS_EXT))
                    .map(ToString::to_string)
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

fn run_name<'a>(file_name: &'a str, prefix: &str, ext: &str) -> Option<&'a str> {
    file_name
        .strip_prefix(prefix)?
        .strip_suffix(ext)
        .filter(|name| !name.is_empty())
}

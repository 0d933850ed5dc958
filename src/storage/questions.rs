//! The questions file: labeled item blocks separated by blank lines.
//!
//! Written from the blocks a run produced, read back as a flat
//! label → block table via the shared paragraph parser, so a file edited
//! by hand (or produced by an older pipeline) loads the same way.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use crate::domain::{ItemBlock, parse_labeled_blocks};

/// Writes item blocks separated by blank lines, with a trailing newline.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_blocks<W: Write>(writer: &mut W, blocks: &[ItemBlock]) -> io::Result<()> {
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "{}", block.text())?;
    }
    Ok(())
}

/// Reads a questions file into a label → block table.
///
/// Paragraphs whose first line carries no label are discarded, matching
/// the parser used on raw generator output.
///
/// # Errors
///
/// Returns an error if the reader fails.
pub fn read_blocks<R: Read>(reader: &mut R) -> io::Result<HashMap<String, String>> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(parse_labeled_blocks(&content))
}

/// Writes the blocks to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn save(path: &Path, blocks: &[ItemBlock]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_blocks(&mut writer, blocks)
}

/// Reads a questions file from a path.
///
/// # Errors
///
/// Returns the underlying I/O error, including `NotFound` when the file
/// does not exist.
pub fn load(path: &Path) -> io::Result<HashMap<String, String>> {
    let mut file = File::open(path)?;
    read_blocks(&mut file)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::domain::ItemLabel;

    fn block(label: &str, body: &str) -> ItemBlock {
        let label: ItemLabel = label.parse().unwrap();
        ItemBlock::labeled(label, body).unwrap()
    }

    #[test]
    fn blocks_are_separated_by_blank_lines() {
        let blocks = vec![block("1a", "What is X?\nA. yes"), block("1b", "What is Y?")];

        let mut bytes = Vec::new();
        write_blocks(&mut bytes, &blocks).unwrap();

        let output = String::from_utf8(bytes).unwrap();
        assert_eq!(output, "1a. What is X?\nA. yes\n\n1b. What is Y?\n");
    }

    #[test]
    fn round_trips_into_a_label_table() {
        let blocks = vec![block("1a", "What is X?"), block("2a", "What is Y?")];

        let mut bytes = Vec::new();
        write_blocks(&mut bytes, &blocks).unwrap();

        let table = read_blocks(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["1a"], "1a. What is X?");
        assert_eq!(table["2a"], "2a. What is Y?");
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("questions.txt");
        let blocks = vec![block("3a", "Why?")];

        save(&path, &blocks).unwrap();
        let table = load(&path).unwrap();

        assert_eq!(table["3a"], "3a. Why?");
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let error = load(&tmp.path().join("missing.txt")).unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }
}

//! The point-to-labels mapping file.
//!
//! A two-column pipe table: source point text on the left, the
//! comma-separated labels of its items on the right. Literal pipes and
//! backslashes in point text are backslash-escaped so the table stays
//! parseable.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::domain::{ItemLabel, LabelError, PointToLabelsMap};

const HEADER: &str = "| Source Point | Question ID(s) |";
const SEPARATOR: &str = "|---|---|";

/// Errors that can occur when loading a mapping file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The mapping file was not found.
    #[error("mapping file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A label in the right-hand column could not be parsed.
    #[error("line {line}: {source}")]
    Label {
        /// The 1-based line number of the offending row.
        line: usize,
        /// The underlying label parse error.
        source: LabelError,
    },
    /// A row did not have exactly two columns.
    #[error("line {line}: expected two columns")]
    Malformed {
        /// The 1-based line number of the offending row.
        line: usize,
    },
}

/// Writes a mapping as a pipe table.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_mapping<W: Write>(writer: &mut W, map: &PointToLabelsMap) -> io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    writeln!(writer, "{SEPARATOR}")?;
    for (point, labels) in map.iter() {
        let labels = labels
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(writer, "| {} | {labels} |", escape(point))?;
    }
    Ok(())
}

/// Reads a mapping from a pipe table.
///
/// The header and separator rows are skipped wherever they appear; blank
/// lines are ignored.
///
/// # Errors
///
/// Returns an error if the reader fails, a row is not a two-column table
/// row, or a label cannot be parsed.
pub fn read_mapping<R: BufRead>(reader: &mut R) -> Result<PointToLabelsMap, LoadError> {
    let mut map = PointToLabelsMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed == HEADER || is_separator(trimmed) {
            continue;
        }

        let fields = split_row(trimmed);
        let [point, labels] = fields.as_slice() else {
            return Err(LoadError::Malformed { line: line_number });
        };

        let labels = labels
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<ItemLabel>().map_err(|source| LoadError::Label {
                    line: line_number,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        map.push(unescape(point.trim()), labels);
    }

    Ok(map)
}

/// Writes the mapping to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn save(path: &Path, map: &PointToLabelsMap) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_mapping(&mut writer, map)
}

/// Reads a mapping from a file.
///
/// # Errors
///
/// Returns [`LoadError::NotFound`] if the file does not exist, or another
/// variant if it cannot be read or parsed.
pub fn load(path: &Path) -> Result<PointToLabelsMap, LoadError> {
    let file = File::open(path).map_err(|io_error| match io_error.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound,
        _ => LoadError::Io(io_error),
    })?;
    let mut reader = BufReader::new(file);
    read_mapping(&mut reader)
}

fn is_separator(line: &str) -> bool {
    line.starts_with('|') && line.trim_matches(['|', '-', ':']).is_empty() && line.contains('-')
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('|', "\\|")
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Splits a table row on unescaped pipes, dropping the empty fields outside
/// the leading and trailing delimiters.
fn split_row(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '|' {
            fields.push(&line[start..index]);
            start = index + 1;
        }
    }
    fields.push(&line[start..]);

    // "| a | b |" splits into ["", " a ", " b ", ""].
    if fields.len() < 2 {
        return Vec::new();
    }
    fields[1..fields.len() - 1].to_vec()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn label(s: &str) -> ItemLabel {
        s.parse().unwrap()
    }

    fn sample_map() -> PointToLabelsMap {
        let mut map = PointToLabelsMap::new();
        map.push(
            "Newton's first law".to_string(),
            vec![label("1a"), label("1b"), label("1c")],
        );
        map.push("Energy | mass equivalence".to_string(), vec![label("2a")]);
        map
    }

    #[test]
    fn round_trips_through_the_table_format() {
        let map = sample_map();

        let mut bytes = Vec::new();
        write_mapping(&mut bytes, &map).unwrap();

        let mut reader = Cursor::new(bytes);
        let parsed = read_mapping(&mut reader).unwrap();

        assert_eq!(parsed, map);
    }

    #[test]
    fn writes_the_expected_rows() {
        let mut bytes = Vec::new();
        write_mapping(&mut bytes, &sample_map()).unwrap();

        let output = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "| Source Point | Question ID(s) |");
        assert_eq!(lines[1], "|---|---|");
        assert_eq!(lines[2], "| Newton's first law | 1a, 1b, 1c |");
        assert_eq!(lines[3], "| Energy \\| mass equivalence | 2a |");
    }

    #[test]
    fn escaped_pipe_survives_parsing() {
        let input = "| Source Point | Question ID(s) |\n|---|---|\n| a \\| b | 1a |\n";
        let mut reader = Cursor::new(input);

        let map = read_mapping(&mut reader).unwrap();
        assert_eq!(map.labels_for("a | b"), Some(&[label("1a")][..]));
    }

    #[test]
    fn entry_with_no_labels_round_trips() {
        let mut map = PointToLabelsMap::new();
        map.push("orphan point".to_string(), Vec::new());

        let mut bytes = Vec::new();
        write_mapping(&mut bytes, &map).unwrap();
        let parsed = read_mapping(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(parsed.labels_for("orphan point"), Some(&[][..]));
    }

    #[test]
    fn malformed_row_is_an_error() {
        let input = "| only one column\n";
        let result = read_mapping(&mut Cursor::new(input));

        assert!(matches!(result, Err(LoadError::Malformed { line: 1 })));
    }

    #[test]
    fn bad_label_reports_its_line() {
        let input = "|---|---|\n| point | 1a |\n| other | wat |\n";
        let result = read_mapping(&mut Cursor::new(input));

        assert!(matches!(result, Err(LoadError::Label { line: 3, .. })));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let result = load(&tmp.path().join("missing.md"));

        assert!(matches!(result, Err(LoadError::NotFound)));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("runs").join("mapping.md");
        let map = sample_map();

        save(&path, &map).unwrap();
        assert_eq!(load(&path).unwrap(), map);
    }
}

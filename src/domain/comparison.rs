//! Merging aligned runs into a single comparison table.
//!
//! Rows are keyed by the union of points across all runs; each run
//! contributes one column. Missing data renders as a placeholder, never as
//! an error, so a partially failed run still produces a usable table.

use std::collections::HashMap;

use super::PointToLabelsMap;

/// The placeholder rendered when a run has no data for a point.
pub const NO_DATA: &str = "-";

/// Sub-letters tried by the conventional-label fallback when a run's
/// mapping has no entry for a point. Fixed at three regardless of how many
/// items a point actually produced; this mirrors the flat-table lookup the
/// persisted format was designed around and is deliberately not
/// generalized.
const FALLBACK_LETTERS: [char; 3] = ['a', 'b', 'c'];

/// One run's worth of aligned output: its name, its point-to-labels
/// mapping, and its label → block-text table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    /// The run name (typically the generation source, e.g. `"openai"`).
    pub name: String,
    /// Point text → labels. May be empty for runs that persisted only a
    /// flat label table.
    pub map: PointToLabelsMap,
    /// Lowercased label key → block text.
    pub blocks: HashMap<String, String>,
}

impl Run {
    /// Creates a run from its parts.
    #[must_use]
    pub const fn new(name: String, map: PointToLabelsMap, blocks: HashMap<String, String>) -> Self {
        Self { name, map, blocks }
    }
}

/// One row of the merged table: a 1-based row number, the point text, and
/// one cell per run holding that run's matched blocks (empty = no data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    /// 1-based row number, assigned after the full union is known.
    pub number: usize,
    /// The point text this row describes.
    pub point: String,
    /// Matched blocks per run, in run order. An empty cell means no data.
    pub cells: Vec<Vec<String>>,
}

/// Builds a merged comparison view over one primary run and any number of
/// secondary runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTable {
    runs: Vec<Run>,
}

impl ComparisonTable {
    /// Creates a table with the primary run, whose point order anchors the
    /// row order.
    #[must_use]
    pub fn new(primary: Run) -> Self {
        Self {
            runs: vec![primary],
        }
    }

    /// Adds a secondary run. Its points extend the row union in discovery
    /// order; rows already present are unaffected.
    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// The run names, primary first.
    #[must_use]
    pub fn run_names(&self) -> Vec<&str> {
        self.runs.iter().map(|run| run.name.as_str()).collect()
    }

    /// Builds the merged rows.
    ///
    /// Row order is the canonical union: the primary run's points in their
    /// original order, then each later run's novel points in that run's
    /// discovery order, duplicates (by exact text) collapsed to their first
    /// appearance.
    #[must_use]
    pub fn rows(&self) -> Vec<ComparisonRow> {
        let mut ordered_points: Vec<&str> = Vec::new();
        for run in &self.runs {
            for (point, _) in run.map.iter() {
                if !ordered_points.contains(&point) {
                    ordered_points.push(point);
                }
            }
        }

        ordered_points
            .into_iter()
            .zip(1..)
            .map(|(point, number)| {
                let cells = self
                    .runs
                    .iter()
                    .map(|run| resolve_cell(run, point, number))
                    .collect();
                ComparisonRow {
                    number,
                    point: point.to_string(),
                    cells,
                }
            })
            .collect()
    }

    /// Renders the table as a pipe-delimited markdown document.
    ///
    /// Cell content has literal pipes escaped and embedded newlines
    /// converted to `<br/>` so the table never breaks. Deterministic:
    /// identical inputs produce byte-identical output.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut lines = Vec::new();

        let header: Vec<String> = ["S.no", "Point"]
            .into_iter()
            .map(ToString::to_string)
            .chain(self.runs.iter().map(|run| run.name.clone()))
            .collect();
        lines.push(format!("| {} |", header.join(" | ")));
        lines.push(format!("|---:|{}", "---|".repeat(self.runs.len() + 1)));

        for row in self.rows() {
            let mut fields = vec![row.number.to_string(), escape_pipes(&row.point)];
            for cell in &row.cells {
                fields.push(render_markdown_cell(cell));
            }
            lines.push(format!("| {} |", fields.join(" | ")));
        }

        lines.join("\n")
    }

    /// Renders the table as a self-contained HTML document, embedding each
    /// matched item as an individually bordered sub-block within its cell.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str(HTML_PREAMBLE);

        out.push_str("<tr><th>S.no</th><th>Point</th>");
        for run in &self.runs {
            out.push_str(&format!("<th>{}</th>", escape_html(&run.name)));
        }
        out.push_str("</tr>\n");

        for row in self.rows() {
            out.push_str(&format!(
                "<tr><td class=\"num\">{}</td><td class=\"point\">{}</td>",
                row.number,
                escape_html(&row.point)
            ));
            for cell in &row.cells {
                out.push_str("<td>");
                if cell.is_empty() {
                    out.push_str(NO_DATA);
                } else {
                    for block in cell {
                        out.push_str(&format!(
                            "<div class=\"item\"><pre>{}</pre></div>",
                            escape_html(block)
                        ));
                    }
                }
                out.push_str("</td>");
            }
            out.push_str("</tr>\n");
        }

        out.push_str("</table>\n</body>\n</html>\n");
        out
    }
}

/// Resolves the blocks for one (point, run) cell.
///
/// Exact mapping entries win; otherwise conventional labels synthesized
/// from the row number and [`FALLBACK_LETTERS`] are looked up directly in
/// the run's flat block table. An empty result renders as the placeholder.
fn resolve_cell(run: &Run, point: &str, row_number: usize) -> Vec<String> {
    if let Some(labels) = run.map.labels_for(point) {
        return labels
            .iter()
            .filter_map(|label| run.blocks.get(&label.key()).cloned())
            .collect();
    }

    FALLBACK_LETTERS
        .iter()
        .filter_map(|letter| run.blocks.get(&format!("{row_number}{letter}")).cloned())
        .collect()
}

fn render_markdown_cell(blocks: &[String]) -> String {
    if blocks.is_empty() {
        return NO_DATA.to_string();
    }
    blocks
        .iter()
        .map(|block| escape_pipes(block).replace('\n', "<br/>"))
        .collect::<Vec<_>>()
        .join("<br/><br/>")
}

fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const HTML_PREAMBLE: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n\
<title>Comparison table</title>\n<style>\n\
table { border-collapse: collapse; width: 100%; }\n\
th, td { border: 1px solid #999; padding: 6px; vertical-align: top; text-align: left; }\n\
td.num { text-align: right; }\n\
td.point { max-width: 24em; }\n\
div.item { border: 1px solid #ccc; border-radius: 4px; padding: 4px; margin-bottom: 6px; }\n\
div.item pre { margin: 0; white-space: pre-wrap; font-family: inherit; }\n\
</style>\n</head>\n<body>\n<table>\n";

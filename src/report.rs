//! Combined-table assembly and text rendering.
//!
//! One table per cycle: rows are canonical team names, columns are sources,
//! cells are the odds strings exactly as extracted. The table is transient —
//! built, rendered, emitted, discarded.

use crate::extract::ExtractionResult;
use std::collections::BTreeMap;

/// Row-per-team, column-per-source table for one reporting cycle.
///
/// Built by outer-joining every source's series on team name: a team present
/// in only some sources gets empty cells in the others. A source whose fetch
/// failed still contributes a column, entirely empty.
#[derive(Debug, Clone)]
pub struct CombinedTable {
    /// Column headers, in configured source order.
    sources: Vec<String>,
    /// Team → one optional cell per source, indexed like `sources`.
    rows: BTreeMap<String, Vec<Option<String>>>,
}

impl CombinedTable {
    /// Outer-join per-source extraction results on team name.
    ///
    /// `columns` holds one entry per configured source, in column order;
    /// `None` marks a source whose fetch failed this cycle.
    pub fn merge(columns: &[(&str, Option<&ExtractionResult>)]) -> Self {
        let sources: Vec<String> = columns.iter().map(|(name, _)| name.to_string()).collect();
        let mut rows: BTreeMap<String, Vec<Option<String>>> = BTreeMap::new();

        for (idx, (_, result)) in columns.iter().enumerate() {
            let Some(result) = result else { continue };
            for (team, odds) in result.pairs() {
                let cells = rows
                    .entry(team.to_string())
                    .or_insert_with(|| vec![None; columns.len()]);
                cells[idx] = Some(odds.to_string());
            }
        }

        Self { sources, rows }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up one cell by team and source name.
    pub fn cell(&self, team: &str, source: &str) -> Option<&str> {
        let idx = self.sources.iter().position(|s| s == source)?;
        self.rows.get(team)?.get(idx)?.as_deref()
    }

    /// Render as an aligned plain-text table, teams in sorted order.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = Vec::with_capacity(self.sources.len() + 1);
        widths.push(
            self.rows
                .keys()
                .map(String::len)
                .chain(std::iter::once("team".len()))
                .max()
                .unwrap_or(4),
        );
        for (idx, source) in self.sources.iter().enumerate() {
            let cell_max = self
                .rows
                .values()
                .filter_map(|cells| cells[idx].as_deref())
                .map(str::len)
                .max()
                .unwrap_or(0);
            widths.push(cell_max.max(source.len()));
        }

        let mut out = String::new();
        let mut header: Vec<String> = vec![format!("{:w$}", "team", w = widths[0])];
        for (idx, source) in self.sources.iter().enumerate() {
            header.push(format!("{:w$}", source, w = widths[idx + 1]));
        }
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        for (team, cells) in &self.rows {
            let mut line: Vec<String> = vec![format!("{:w$}", team, w = widths[0])];
            for (idx, cell) in cells.iter().enumerate() {
                line.push(format!(
                    "{:w$}",
                    cell.as_deref().unwrap_or(""),
                    w = widths[idx + 1]
                ));
            }
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

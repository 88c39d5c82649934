//! Raw, untyped table handed in by an ingestion collaborator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single uninterpreted cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Number(Decimal),
    Empty,
}

impl Cell {
    /// Whitespace-only text counts as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Text representation used by the parsing rules.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Empty => Cow::Borrowed(""),
        }
    }

    /// Trimmed text, or `None` for empty cells.
    pub fn non_empty_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(self.as_text().trim().to_string())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }
}

impl From<Decimal> for Cell {
    fn from(n: Decimal) -> Self {
        Cell::Number(n)
    }
}

/// Named columns of equal length.
///
/// Stored row-major; short rows are padded with [`Cell::Empty`] and long rows truncated
/// so every row has exactly one cell per column. Deserialized tables are padded the same
/// way.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "UnpaddedTable")]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

#[derive(Deserialize)]
struct UnpaddedTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Cell>>,
}

impl From<UnpaddedTable> for RawTable {
    fn from(t: UnpaddedTable) -> Self {
        RawTable::with_rows(t.columns, t.rows)
    }
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Concatenate tables (e.g. one per document page).
    ///
    /// Columns are the ordered union of all names; cells missing from a table are empty.
    pub fn concat(tables: impl IntoIterator<Item = RawTable>) -> RawTable {
        let tables: Vec<RawTable> = tables.into_iter().collect();
        let mut columns: Vec<String> = Vec::new();
        let mut mappings: Vec<Vec<usize>> = Vec::with_capacity(tables.len());
        for t in &tables {
            let mapping = t
                .columns
                .iter()
                .map(|c| match columns.iter().position(|o| o == c) {
                    Some(i) => i,
                    None => {
                        columns.push(c.clone());
                        columns.len() - 1
                    }
                })
                .collect();
            mappings.push(mapping);
        }

        let mut out = RawTable::new(columns);
        for (t, mapping) in tables.into_iter().zip(mappings) {
            for row in t.rows {
                let mut merged = vec![Cell::Empty; out.columns.len()];
                for (cell, &target) in row.into_iter().zip(&mapping) {
                    merged[target] = cell;
                }
                out.rows.push(merged);
            }
        }
        out
    }
}

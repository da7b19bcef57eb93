//! Untyped tabular input: a header row plus rows of cells.
//!
//! Both the spreadsheet reader and the CSV reader produce a `RawTable`;
//! the loader then pulls typed records out of it by column name.

use crate::error::{BonusError, BonusResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Cell contents as text. Empty cells and whitespace-only text are `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }
}

/// Integral values print without a fractional part, the way a
/// spreadsheet shows them.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a required column, or `MissingColumn` naming it.
    pub fn require_column(&self, table: &str, name: &str) -> BonusResult<usize> {
        self.column_index(name).ok_or_else(|| BonusError::MissingColumn {
            table: table.to_string(),
            column: name.to_string(),
        })
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Cell at `col` of `row`. Short rows read as empty.
pub fn cell_at(row: &[Cell], col: usize) -> &Cell {
    row.get(col).unwrap_or(&EMPTY_CELL)
}

//! Raw tabular input handed over by the spreadsheet reader

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use volley_core::{Error, Result};

/// One spreadsheet cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Empty, or text that is only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Trimmed text; numbers are rendered without a trailing `.0`
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(Cow::Borrowed(s.trim())),
            Cell::Number(n) if n.fract() == 0.0 => Some(Cow::Owned(format!("{}", *n as i64))),
            Cell::Number(n) => Some(Cow::Owned(n.to_string())),
        }
    }

    /// Numeric value; text is parsed after trimming
    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Positive whole number (set, point, rotation indices)
    pub fn index(&self) -> Option<u32> {
        self.number()
            .filter(|n| *n >= 1.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
            .map(|n| n as u32)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Number(n as f64)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// A named table of cells with a header row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new<I, S>(name: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Builder-style row append
    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.push_row(row);
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column index by header, trimmed and case-insensitive
    pub fn column(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// First matching column among alternative spellings
    pub fn column_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.column(n))
    }

    /// Indices of all required columns, or the names of those missing
    pub fn require(&self, names: &[&str]) -> std::result::Result<Vec<usize>, Vec<String>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column(name) {
                Some(idx) => found.push(idx),
                None => missing.push(name.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(missing)
        }
    }

    /// Like [`require`](Self::require) but as a hard failure
    pub fn require_strict(&self, names: &[&str]) -> Result<Vec<usize>> {
        self.require(names).map_err(|columns| Error::MissingColumns {
            table: self.name.clone(),
            columns,
        })
    }

    /// Rows with 1-based row numbers (header excluded)
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[Cell])> {
        self.rows.iter().enumerate().map(|(i, r)| (i + 1, r.as_slice()))
    }
}

/// Cell lookup tolerant of short rows
pub(crate) fn cell(row: &[Cell], idx: Option<usize>) -> &Cell {
    const EMPTY: &Cell = &Cell::Empty;
    idx.and_then(|i| row.get(i)).unwrap_or(EMPTY)
}

// ============================================================
// DECODED TABLE TYPES
// ============================================================
// Header row plus data rows, independent of the source format

use serde::{Deserialize, Serialize};

/// A decoded sheet or delimited-text file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedTable {
    /// Header cells in column order (already trimmed)
    pub headers: Vec<String>,

    /// Data rows; a row may be shorter than the header row
    pub rows: Vec<Vec<String>>,
}

impl DecodedTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Each data row as an ordered header -> value mapping.
    pub fn row_maps(&self) -> impl Iterator<Item = RowMap<'_>> {
        self.rows.iter().map(move |row| RowMap {
            headers: &self.headers,
            values: row,
        })
    }
}

/// Ordered header -> value view over one row.
///
/// Columns without a corresponding cell read as empty text.
#[derive(Debug, Clone, Copy)]
pub struct RowMap<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> RowMap<'a> {
    pub fn new(headers: &'a [String], values: &'a [String]) -> Self {
        Self { headers, values }
    }

    pub fn headers(&self) -> &'a [String] {
        self.headers
    }

    pub fn value_at(&self, column: usize) -> &'a str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }
}

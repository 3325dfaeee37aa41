//! Table types.

use serde::{Deserialize, Serialize};

/// A table parsed from section content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column titles
    pub header: TableRow,

    /// Body rows; widths are not validated against the header
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a table with the given header.
    pub fn with_header(header: TableRow) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Parse comma-delimited text. The first line is the header; blank
    /// lines are dropped.
    pub fn from_delimited(raw: &str) -> Self {
        let mut lines = raw.split('\n');
        let header = TableRow::from_delimited(lines.next().unwrap_or_default());
        let rows = lines
            .filter(|line| !line.trim().is_empty())
            .map(TableRow::from_delimited)
            .collect();
        Self { header, rows }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Check if the table has no body.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cell values
    pub cells: Vec<String>,
}

impl TableRow {
    /// Create a row from cell values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            cells: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Split one comma-delimited line.
    pub fn from_delimited(line: &str) -> Self {
        Self::from_strings(line.split(','))
    }

    /// Re-join the cells as a delimited line.
    pub fn to_delimited(&self) -> String {
        self.cells.join(",")
    }
}

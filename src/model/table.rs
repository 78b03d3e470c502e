//! Parsed table types.

use super::TableParsePattern;
use serde::{Deserialize, Serialize};

/// A table extracted from a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTable {
    /// The pattern this table was extracted with
    pub settings: TableParsePattern,

    /// Header row, when the pattern declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,

    /// Data rows in source order (never empty)
    pub rows: Vec<Vec<String>>,

    /// Free text before the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_text: Option<String>,

    /// Free text after the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_text: Option<String>,
}

impl ParsedTable {
    /// Create an empty table for the given pattern.
    pub fn new(settings: TableParsePattern) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Get the table name, if the pattern declares one.
    pub fn name(&self) -> Option<&str> {
        self.settings.name.as_deref()
    }

    /// Get the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest of header and rows).
    pub fn column_count(&self) -> usize {
        self.headers
            .iter()
            .chain(self.rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    /// Check if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether rows (and header) differ in cell count.
    pub fn is_ragged(&self) -> bool {
        let mut widths = self.headers.iter().chain(self.rows.iter()).map(Vec::len);
        match widths.next() {
            Some(first) => widths.any(|w| w != first),
            None => false,
        }
    }

    /// Get a cell.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Read a cell of a declared numeric column as a number.
    ///
    /// Thousands separators and a trailing unit suffix ("12.5 MB", "1,024KB")
    /// are tolerated. Returns `None` for non-numeric columns.
    pub fn numeric_value(&self, row: usize, column: usize) -> Option<f64> {
        if !self.settings.is_numeric(column) {
            return None;
        }
        parse_number(self.cell(row, column)?)
    }

    /// Get the index of a header by name.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.as_ref()?.iter().position(|h| h == header)
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref pre) = self.pre_text {
            lines.push(pre.clone());
        }
        lines.extend(self.headers.iter().chain(self.rows.iter()).map(|r| r.join("\t")));
        if let Some(ref post) = self.post_text {
            lines.push(post.clone());
        }
        lines.join("\n")
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    let end = cleaned
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .map(|(i, _)| i)
        .unwrap_or(cleaned.len());
    cleaned[..end].trim().parse().ok()
}

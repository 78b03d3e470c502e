//! Table body isolation and column splitting.

use super::options::UnmatchedLines;
use crate::error::{Error, Result};
use crate::model::TableParsePattern;
use regex::{Captures, Match, Regex};

/// A table pattern with its regular expressions compiled.
#[derive(Debug, Clone)]
pub(crate) struct CompiledTable {
    pub settings: TableParsePattern,
    label: String,
    matcher: Regex,
    body_group: usize,
    post_group: usize,
    splitter: CellSplitter,
}

#[derive(Debug, Clone)]
enum CellSplitter {
    Capture { regex: Regex, columns: Vec<String> },
    Separator(String),
}

/// The three parts of a section span around one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TableSpan<'t> {
    pub pre: &'t str,
    pub body: &'t str,
    pub post: &'t str,
}

impl CompiledTable {
    /// Compile a pattern; `context` names the section and table for errors.
    pub fn compile(settings: &TableParsePattern, context: String, label: String) -> Result<Self> {
        if let Some(problem) = settings.strategy_problem() {
            return Err(Error::invalid_pattern(context, problem));
        }

        let start_groups = marker_groups(&settings.start_pattern, &context)?;
        let end_groups = marker_groups(&settings.end_pattern, &context)?;
        let matcher = Regex::new(&format!(
            r"(?m)\A(?s:(.*?))(?:{})[^\n]*\n?(?s:(.*?))(?:{})(?s:(.*))\z",
            settings.start_pattern, settings.end_pattern
        ))
        .map_err(|e| Error::invalid_pattern(context.clone(), e))?;

        let splitter = match (&settings.row_pattern, &settings.separator) {
            (Some(row_pattern), _) => {
                let regex = Regex::new(row_pattern)
                    .map_err(|e| Error::invalid_pattern(context.clone(), e))?;
                for column in &settings.columns {
                    if !regex.capture_names().flatten().any(|name| name == column) {
                        return Err(Error::invalid_pattern(
                            context,
                            format!("row pattern has no capture group named '{}'", column),
                        ));
                    }
                }
                CellSplitter::Capture {
                    regex,
                    columns: settings.columns.clone(),
                }
            }
            (None, Some(separator)) => {
                if separator.is_empty() {
                    return Err(Error::invalid_pattern(context, "separator is empty"));
                }
                CellSplitter::Separator(separator.clone())
            }
            (None, None) => {
                return Err(Error::invalid_pattern(
                    context,
                    "declares neither a separator nor a row pattern",
                ))
            }
        };

        Ok(Self {
            settings: settings.clone(),
            label,
            matcher,
            body_group: start_groups + 2,
            post_group: start_groups + end_groups + 3,
            splitter,
        })
    }

    /// Locate the table inside a section span.
    ///
    /// The start-marker line is excluded from the body; the body ends where
    /// the end marker begins.
    pub fn isolate<'t>(&self, span: &'t str) -> Option<TableSpan<'t>> {
        let caps = self.matcher.captures(span)?;
        let part = |group: usize| caps.get(group).map_or("", |m| m.as_str());
        Some(TableSpan {
            pre: part(1),
            body: part(self.body_group),
            post: part(self.post_group),
        })
    }

    /// Split a table body into rows of cells.
    ///
    /// Lines are trimmed and blank lines dropped; rows keep source order.
    pub fn split_rows(&self, body: &str, unmatched: UnmatchedLines) -> Result<Vec<Vec<String>>> {
        let mut rows = Vec::new();

        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.split_line(line) {
                Some(cells) => rows.push(cells),
                None => match unmatched {
                    UnmatchedLines::Drop => {
                        log::debug!("table '{}': dropping unmatched line: {}", self.label, line);
                    }
                    UnmatchedLines::Fail => {
                        return Err(Error::UnmatchedRow {
                            table: self.label.clone(),
                            line: line.to_string(),
                        });
                    }
                    UnmatchedLines::Raw => rows.push(vec![line.to_string()]),
                },
            }
        }

        Ok(rows)
    }

    fn split_line(&self, line: &str) -> Option<Vec<String>> {
        match &self.splitter {
            CellSplitter::Separator(separator) => Some(
                line.split(separator.as_str())
                    .map(|cell| cell.trim().to_string())
                    .collect(),
            ),
            CellSplitter::Capture { regex, columns } => {
                let caps = regex.captures(line)?;
                Some(expand_list_cell(capture_cells(&caps, columns)))
            }
        }
    }
}

fn text(m: Option<Match<'_>>) -> String {
    m.map_or("", |m| m.as_str()).trim().to_string()
}

fn capture_cells(caps: &Captures<'_>, columns: &[String]) -> Vec<String> {
    if !columns.is_empty() {
        return columns.iter().map(|c| text(caps.name(c))).collect();
    }
    if caps.len() == 1 {
        return vec![text(caps.get(0))];
    }
    (1..caps.len()).map(|i| text(caps.get(i))).collect()
}

/// Expand `[label, "a, b, c"]` into `[label, a, b, c]`.
fn expand_list_cell(cells: Vec<String>) -> Vec<String> {
    if cells.len() != 2 || !cells[1].contains(',') {
        return cells;
    }
    let mut cells = cells.into_iter();
    let label = cells.next().unwrap_or_default();
    let values = cells.next().unwrap_or_default();

    std::iter::once(label)
        .chain(values.split(',').map(|v| v.trim().to_string()))
        .collect()
}

/// Number of capture groups a marker pattern contributes to an enclosing matcher.
///
/// Markers are spliced into a larger expression, so the outer groups are
/// addressed by index past the marker's own groups.
pub(crate) fn marker_groups(marker: &str, context: &str) -> Result<usize> {
    let regex = Regex::new(&format!("(?m){}", marker))
        .map_err(|e| Error::invalid_pattern(context.to_string(), e))?;
    Ok(regex.captures_len() - 1)
}

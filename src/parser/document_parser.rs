//! Report text to structured document.

use super::options::ParseOptions;
use super::table::{marker_groups, CompiledTable};
use crate::error::{Error, Result};
use crate::model::{ParsedDocument, ParsedSection, ParsedTable, ResolvedSectionConfig};
use regex::Regex;
use std::borrow::Cow;

const ECHO_BEGIN: &str = "MemReport: Begin command \"";
const ECHO_END: &str = "MemReport: End command \"";

/// A section with its markers and table patterns compiled.
#[derive(Debug, Clone)]
pub(crate) struct CompiledSection {
    name: String,
    matcher: Regex,
    body_group: usize,
    tables: Vec<CompiledTable>,
}

/// Compile the markers and table patterns of a section.
///
/// # Errors
/// `Error::InvalidPattern` naming the section (and table) at fault.
pub(crate) fn compile_section(section: &ResolvedSectionConfig) -> Result<CompiledSection> {
    let context = format!("section '{}'", section.name);
    let body_group = marker_groups(&section.start_pattern, &context)? + 1;
    let matcher = Regex::new(&format!(
        r"(?m)(?:{})(?s:(.*?))(?:{})$",
        section.start_pattern, section.end_pattern
    ))
    .map_err(|e| Error::invalid_pattern(context.clone(), e))?;

    let tables = section
        .tables
        .iter()
        .enumerate()
        .map(|(index, table)| {
            let label = table
                .name
                .clone()
                .unwrap_or_else(|| format!("{} #{}", section.name, index + 1));
            CompiledTable::compile(table, format!("{} table '{}'", context, label), label)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CompiledSection {
        name: section.name.clone(),
        matcher,
        body_group,
        tables,
    })
}

/// Applies resolved section rules to report text.
///
/// # Example
///
/// ```no_run
/// use memreport::{DocumentParser, ResolvedSectionConfig};
///
/// # async fn run(text: &str, sections: &[ResolvedSectionConfig]) -> memreport::Result<()> {
/// let doc = DocumentParser::new().parse(text, "Level01", sections).await?;
/// for section in &doc.sections {
///     println!("{}: {} tables", section.title, section.tables.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    options: ParseOptions,
}

impl DocumentParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Get the parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse report text into a document.
    ///
    /// Sections are processed one at a time in configuration order; sections
    /// whose markers are not found are left out. After every
    /// `yield_every` appended sections control is handed back to the runtime.
    ///
    /// # Errors
    /// * `Error::InvalidPattern` if any marker or row pattern is malformed
    ///   (checked before any text is examined)
    /// * `Error::UnmatchedRow` if a table line does not match and the
    ///   options say to fail
    pub async fn parse(
        &self,
        text: &str,
        title: &str,
        sections: &[ResolvedSectionConfig],
    ) -> Result<ParsedDocument> {
        let compiled = sections
            .iter()
            .map(compile_section)
            .collect::<Result<Vec<_>>>()?;
        let text = normalize_line_endings(text);

        let mut doc = ParsedDocument::new(title);
        for section in &compiled {
            let Some(parsed) = self.parse_section(&text, section)? else {
                continue;
            };
            doc.add_section(parsed);

            if self.options.yield_every > 0 && doc.section_count() % self.options.yield_every == 0 {
                tokio::task::yield_now().await;
            }
        }

        log::debug!(
            "parsed '{}': {} of {} sections, {} tables",
            title,
            doc.section_count(),
            sections.len(),
            doc.table_count()
        );
        Ok(doc)
    }

    fn parse_section(&self, text: &str, section: &CompiledSection) -> Result<Option<ParsedSection>> {
        let Some(caps) = section.matcher.captures(text) else {
            log::debug!("section '{}' not present in report", section.name);
            return Ok(None);
        };
        let span = caps.get(0).map_or("", |m| m.as_str());
        let interior = caps
            .get(section.body_group)
            .map_or("", |m| m.as_str());

        if section.tables.is_empty() {
            return Ok(Some(ParsedSection::text(
                &section.name,
                strip_echo_lines(interior),
            )));
        }

        let mut found = Vec::new();
        for table in &section.tables {
            let Some(parts) = table.isolate(span) else {
                log::debug!(
                    "section '{}': table pattern '{}' did not match",
                    section.name,
                    table.settings.start_pattern
                );
                continue;
            };

            let mut rows = table.split_rows(parts.body, self.options.unmatched_lines)?;
            let mut parsed = ParsedTable::new(table.settings.clone());
            if table.settings.has_header_row && !rows.is_empty() {
                parsed.headers = Some(rows.remove(0));
            }
            parsed.rows = rows;
            found.push((parsed, parts.pre, parts.post));
        }

        // Only the outer edges of a run of tables keep their free text.
        let last = found.len().saturating_sub(1);
        let tables = found
            .into_iter()
            .enumerate()
            .map(|(index, (mut table, pre, post))| {
                if index == 0 {
                    table.pre_text = free_text(pre);
                }
                if index == last {
                    table.post_text = free_text(post);
                }
                table
            })
            .collect();

        Ok(Some(ParsedSection::tabular(&section.name, tables)))
    }
}

/// Convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Check for a `MemReport: Begin/End command "..."` echo line.
pub fn is_echo_line(line: &str) -> bool {
    let line = line.trim();
    (line.starts_with(ECHO_BEGIN) || line.starts_with(ECHO_END)) && line.ends_with('"')
}

/// Remove command echo lines and surrounding newlines.
pub fn strip_echo_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !is_echo_line(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

fn free_text(text: &str) -> Option<String> {
    let text = strip_echo_lines(text);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

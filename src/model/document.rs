//! Document-level types.

use super::ParsedTable;
use serde::{Deserialize, Serialize};

/// A parsed memreport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    /// Document title
    pub title: String,

    /// Sections found in the report, in configuration order
    pub sections: Vec<ParsedSection>,
}

impl ParsedDocument {
    /// Create a new empty document.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Get the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Get the total number of tables across all sections.
    pub fn table_count(&self) -> usize {
        self.sections.iter().map(|s| s.tables.len()).sum()
    }

    /// Get the first section with the given title.
    pub fn section(&self, title: &str) -> Option<&ParsedSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Add a section to the document.
    pub fn add_section(&mut self, section: ParsedSection) {
        self.sections.push(section);
    }

    /// Check if the document has any sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|section| section.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A section of a parsed memreport.
///
/// Carries either `content` (plain-text section) or `tables`, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSection {
    /// Section title
    pub title: String,

    /// Text of a plain-text section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tables of a tabular section
    #[serde(default)]
    pub tables: Vec<ParsedTable>,
}

impl ParsedSection {
    /// Create a plain-text section.
    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
            tables: Vec::new(),
        }
    }

    /// Create a tabular section.
    pub fn tabular(title: impl Into<String>, tables: Vec<ParsedTable>) -> Self {
        Self {
            title: title.into(),
            content: None,
            tables,
        }
    }

    /// Check whether this is a plain-text section.
    pub fn is_text(&self) -> bool {
        self.content.is_some()
    }

    /// Get the first table with the given name.
    pub fn table(&self, name: &str) -> Option<&ParsedTable> {
        self.tables.iter().find(|t| t.name() == Some(name))
    }

    /// Get plain text representation of the section.
    pub fn plain_text(&self) -> String {
        let body = match self.content {
            Some(ref content) => content.clone(),
            None => self
                .tables
                .iter()
                .map(|t| t.plain_text())
                .collect::<Vec<_>>()
                .join("\n\n"),
        };
        format!("{}\n{}", self.title, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableParsePattern;

    #[test]
    fn test_document_new() {
        let doc = ParsedDocument::new("report");
        assert!(doc.is_empty());
        assert_eq!(doc.section_count(), 0);
        assert_eq!(doc.table_count(), 0);
    }

    #[test]
    fn test_section_constructors_keep_invariant() {
        let text = ParsedSection::text("Memory", "Process Physical Memory: 812 MB");
        assert!(text.is_text());
        assert!(text.tables.is_empty());

        let tabular = ParsedSection::tabular(
            "Textures",
            vec![ParsedTable::new(TableParsePattern::default().named("Listing"))],
        );
        assert!(!tabular.is_text());
        assert!(tabular.table("Listing").is_some());
    }

    #[test]
    fn test_lookup_and_serialization() {
        let mut doc = ParsedDocument::new("report");
        doc.add_section(ParsedSection::text("A", "alpha"));
        doc.add_section(ParsedSection::tabular("B", vec![]));

        assert_eq!(doc.section("A").unwrap().content.as_deref(), Some("alpha"));
        assert!(doc.section("C").is_none());

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["sections"][0].get("content").is_some());
        assert!(json["sections"][1].get("content").is_none());
        assert_eq!(doc.plain_text(), "A\nalpha\n\nB\n");
    }
}

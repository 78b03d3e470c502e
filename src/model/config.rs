//! Section and table extraction rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A section as declared by a base-settings document, before pattern resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDefinition {
    /// Section name (becomes the parsed section title)
    pub name: String,

    /// Regular expression marking the start of the section
    pub start_pattern: String,

    /// Regular expression marking the end of the section
    pub end_pattern: String,

    /// Identifier of the table pattern resource for this section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_pattern_id: Option<String>,
}

impl SectionDefinition {
    /// Create a section definition without a pattern reference.
    pub fn new(
        name: impl Into<String>,
        start_pattern: impl Into<String>,
        end_pattern: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            start_pattern: start_pattern.into(),
            end_pattern: end_pattern.into(),
            parse_pattern_id: None,
        }
    }

    /// Set the pattern id and return self.
    pub fn with_pattern_id(mut self, id: impl Into<String>) -> Self {
        self.parse_pattern_id = Some(id.into());
        self
    }
}

/// Rule for locating one table inside a section and splitting it into cells.
///
/// Exactly one of `separator` and `row_pattern` must be set. When `row_pattern`
/// is used, `columns` may name its capture groups in output order; otherwise
/// groups are taken positionally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableParsePattern {
    /// Table name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Regular expression on the line that precedes the table body
    pub start_pattern: String,

    /// Regular expression where the table body ends
    pub end_pattern: String,

    /// Whether the first body row is a header
    #[serde(default)]
    pub has_header_row: bool,

    /// Literal cell separator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Per-line regular expression whose capture groups become cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_pattern: Option<String>,

    /// Named capture groups of `row_pattern`, in column order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,

    /// Indices of columns holding numbers
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub numeric_columns: BTreeSet<usize>,
}

impl TableParsePattern {
    /// Create a separator-split table pattern.
    pub fn separated(
        start_pattern: impl Into<String>,
        end_pattern: impl Into<String>,
        separator: impl Into<String>,
    ) -> Self {
        Self {
            start_pattern: start_pattern.into(),
            end_pattern: end_pattern.into(),
            separator: Some(separator.into()),
            ..Default::default()
        }
    }

    /// Create a capture-group table pattern.
    pub fn captured(
        start_pattern: impl Into<String>,
        end_pattern: impl Into<String>,
        row_pattern: impl Into<String>,
    ) -> Self {
        Self {
            start_pattern: start_pattern.into(),
            end_pattern: end_pattern.into(),
            row_pattern: Some(row_pattern.into()),
            ..Default::default()
        }
    }

    /// Set the table name and return self.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the first body row as header and return self.
    pub fn with_header(mut self) -> Self {
        self.has_header_row = true;
        self
    }

    /// Name the capture groups to emit, in order, and return self.
    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Declare numeric column indices and return self.
    pub fn with_numeric_columns(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.numeric_columns = columns.into_iter().collect();
        self
    }

    /// Describe a missing or conflicting cell splitting strategy.
    pub fn strategy_problem(&self) -> Option<&'static str> {
        match (&self.separator, &self.row_pattern) {
            (Some(_), Some(_)) => Some("declares both a separator and a row pattern"),
            (None, None) => Some("declares neither a separator nor a row pattern"),
            _ => None,
        }
    }

    /// Whether the column at `index` holds numbers.
    pub fn is_numeric(&self, index: usize) -> bool {
        self.numeric_columns.contains(&index)
    }
}

/// A section with its table patterns resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSectionConfig {
    /// Section name
    pub name: String,

    /// Regular expression marking the start of the section
    pub start_pattern: String,

    /// Regular expression marking the end of the section
    pub end_pattern: String,

    /// Table patterns (empty for plain-text sections)
    #[serde(default)]
    pub tables: Vec<TableParsePattern>,
}

impl ResolvedSectionConfig {
    /// Resolve a definition against its table patterns.
    pub fn from_definition(definition: SectionDefinition, tables: Vec<TableParsePattern>) -> Self {
        Self {
            name: definition.name,
            start_pattern: definition.start_pattern,
            end_pattern: definition.end_pattern,
            tables,
        }
    }

    /// Whether this section is parsed as plain text.
    pub fn is_plain_text(&self) -> bool {
        self.tables.is_empty()
    }

    /// Strip the table patterns, keeping the section boundaries.
    pub fn to_definition(&self) -> SectionDefinition {
        SectionDefinition::new(&self.name, &self.start_pattern, &self.end_pattern)
    }
}

/// The complete rule set for one engine version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEngineConfig {
    /// Version tag
    pub version: String,

    /// Human-readable description
    pub description: String,

    /// Sections in report order
    pub sections: Vec<ResolvedSectionConfig>,
}

impl ResolvedEngineConfig {
    /// Number of sections that carry table patterns.
    pub fn tabular_section_count(&self) -> usize {
        self.sections.iter().filter(|s| !s.is_plain_text()).count()
    }

    /// Drop table patterns, as read back from base settings.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            version: self.version.clone(),
            description: self.description.clone(),
            sections: self.sections.iter().map(|s| s.to_definition()).collect(),
        }
    }
}

/// Section definitions read from a base-settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Version tag
    pub version: String,

    /// Human-readable description
    pub description: String,

    /// Sections in declaration order
    pub sections: Vec<SectionDefinition>,
}

//! Legacy structured section documents.
//!
//! Older engine versions ship their whole rule set as one JSON document,
//! already shaped as sections and tables but with its own field names.

use crate::error::{Error, Result};
use crate::model::{EngineVersion, ResolvedEngineConfig, ResolvedSectionConfig, TableParsePattern};
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Debug, Deserialize)]
struct LegacyDocument {
    #[serde(default)]
    description: Option<String>,
    sections: Vec<LegacySection>,
}

#[derive(Debug, Deserialize)]
struct LegacySection {
    title: String,
    begin: String,
    end: String,
    #[serde(default)]
    tables: Vec<LegacyTable>,
}

#[derive(Debug, Deserialize)]
struct LegacyTable {
    #[serde(default)]
    title: Option<String>,
    begin: String,
    end: String,
    #[serde(default)]
    header: bool,
    #[serde(default)]
    delimiter: Option<String>,
    #[serde(default)]
    regex: Option<String>,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    numeric: BTreeSet<usize>,
}

impl From<LegacyTable> for TableParsePattern {
    fn from(table: LegacyTable) -> Self {
        TableParsePattern {
            name: table.title,
            start_pattern: table.begin,
            end_pattern: table.end,
            has_header_row: table.header,
            separator: table.delimiter,
            row_pattern: table.regex,
            columns: table.fields,
            numeric_columns: table.numeric,
        }
    }
}

impl From<LegacySection> for ResolvedSectionConfig {
    fn from(section: LegacySection) -> Self {
        ResolvedSectionConfig {
            name: section.title,
            start_pattern: section.begin,
            end_pattern: section.end,
            tables: section.tables.into_iter().map(Into::into).collect(),
        }
    }
}

/// Translate a legacy section document into a resolved configuration.
pub fn parse_legacy_document(text: &str, version: EngineVersion) -> Result<ResolvedEngineConfig> {
    let document: LegacyDocument = serde_json::from_str(text).map_err(|e| {
        Error::Config(format!(
            "legacy section document for {} is malformed: {}",
            version, e
        ))
    })?;

    Ok(ResolvedEngineConfig {
        version: version.tag().to_string(),
        description: document
            .description
            .unwrap_or_else(|| format!("Unreal Engine {} (legacy document)", version)),
        sections: document.sections.into_iter().map(Into::into).collect(),
    })
}

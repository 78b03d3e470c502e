//! JSON rendering for parsed reports.

use crate::error::{Error, Result};
use crate::model::ParsedDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &ParsedDocument, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParsedSection, ParsedTable, TableParsePattern};

    fn sample() -> ParsedDocument {
        let mut doc = ParsedDocument::new("Level01");
        doc.add_section(ParsedSection::text("Memory", "Process Physical Memory: 1024 MB"));

        let mut table = ParsedTable::new(
            TableParsePattern::separated("Listing", "Total", ",").named("Textures"),
        );
        table.headers = Some(vec!["Name".into(), "Size".into()]);
        table.rows = vec![vec!["T_Rock".into(), "12".into()]];
        doc.add_section(ParsedSection::tabular("ListTextures", vec![table]));
        doc
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Level01"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
    }

    #[test]
    fn test_to_json_reads_back() {
        let doc = sample();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sections"].as_array().unwrap().len(), 2);
        assert_eq!(value["sections"][1]["tables"][0]["rows"][0][0], "T_Rock");
    }
}

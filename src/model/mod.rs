//! Data model for configuration and parsed reports.
//!
//! Configuration types describe how a report is carved up (sections and the
//! table patterns inside them); document types hold the result. Both are
//! plain serde-serializable values with no lifecycle of their own.

mod config;
mod document;
mod table;
mod version;

pub use config::{
    EngineConfig, ResolvedEngineConfig, ResolvedSectionConfig, SectionDefinition,
    TableParsePattern,
};
pub use document::{ParsedDocument, ParsedSection};
pub use table::ParsedTable;
pub use version::{manifest_path, EngineVersion, Pipeline};

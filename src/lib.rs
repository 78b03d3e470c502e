//! # memreport
//!
//! Pattern-driven parsing of engine memreport dumps.
//!
//! A memreport is a long plain-text dump of console command output. This
//! library detects which engine version produced it, resolves the matching
//! set of section and table rules, and turns the text into a structured
//! [`ParsedDocument`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use memreport::{parse_file, render};
//!
//! # async fn run() -> memreport::Result<()> {
//! // Parse a report against the bundled rule set
//! let doc = parse_file("Level01.memreport", "resources").await?;
//!
//! // Convert to JSON
//! let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//! println!("{}", json);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Version detection**: from content markers, never fails
//! - **Two configuration dialects**: legacy section lists and command lists
//! - **Soft gaps**: missing table patterns degrade sections to plain text
//! - **Order preserving**: sections, tables and rows keep source order

pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use config::{ConfigResolver, DirSource, EngineConfigReader, MemorySource, ResourceSource};
pub use detect::{detect_version, detect_version_from_path};
pub use error::{Error, Result};
pub use model::{
    EngineConfig, EngineVersion, ParsedDocument, ParsedSection, ParsedTable, Pipeline,
    ResolvedEngineConfig, ResolvedSectionConfig, SectionDefinition, TableParsePattern,
};
pub use parser::{DocumentParser, ParseOptions, UnmatchedLines};
pub use render::JsonFormat;

use std::path::Path;

/// Parse report text end to end: detect, resolve, parse.
///
/// # Example
///
/// ```no_run
/// use memreport::{parse_report, ConfigResolver, DirSource};
///
/// # async fn run(text: &str) -> memreport::Result<()> {
/// let resolver = ConfigResolver::new(DirSource::new("resources"));
/// let doc = parse_report(&resolver, text, "Level01").await?;
/// println!("Sections: {}", doc.section_count());
/// # Ok(())
/// # }
/// ```
pub async fn parse_report<S: ResourceSource>(
    resolver: &ConfigResolver<S>,
    text: &str,
    title: &str,
) -> Result<ParsedDocument> {
    parse_report_with_options(resolver, text, title, ParseOptions::default()).await
}

/// Parse report text with custom options.
pub async fn parse_report_with_options<S: ResourceSource>(
    resolver: &ConfigResolver<S>,
    text: &str,
    title: &str,
    options: ParseOptions,
) -> Result<ParsedDocument> {
    let version = detect_version(text);
    log::debug!("'{}' detected as engine {}", title, version);

    let config = resolver.resolve(version).await?;
    DocumentParser::with_options(options)
        .parse(text, title, &config.sections)
        .await
}

/// Parse a report file using rules from a resource directory.
///
/// The document title is the file stem.
///
/// # Arguments
///
/// * `path` - Path to the report
/// * `resources` - Root of the version family folders
pub async fn parse_file<P: AsRef<Path>, R: AsRef<Path>>(
    path: P,
    resources: R,
) -> Result<ParsedDocument> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let text = String::from_utf8_lossy(&bytes);

    let resolver = ConfigResolver::new(DirSource::new(resources.as_ref()));
    parse_report(&resolver, &text, &report_title(path)).await
}

/// Title for a report file: its stem, or the whole name when it has none.
pub fn report_title(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "memreport".to_string())
}

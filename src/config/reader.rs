//! Base-settings reader for the two ini dialects.
//!
//! The legacy dialect lists sections explicitly:
//!
//! ```text
//! [MemReportSections]
//! ; Name=StartMarker|EndMarker|PatternId
//! Textures=Listing all textures|Total size: .*|list_textures
//! ```
//!
//! The modern dialect mirrors the engine's own command registration, and the
//! section markers are synthesized from the command echo lines the engine
//! writes around each command's output:
//!
//! ```text
//! [MemReportCommands]
//! +Cmd="stat memory"
//! ```

use crate::model::{EngineConfig, SectionDefinition};
use std::collections::HashMap;

const LEGACY_HEADER: &str = "[MemReportSections]";
const MODERN_HEADERS: [&str; 2] = ["[MemReportCommands]", "[MemReportFullCommands]"];
const COMMAND_PREFIX: &str = "+Cmd=";

/// Characters that cannot appear in a pattern resource name.
const RESERVED_CHARS: [char; 10] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*', '.'];

/// Base-settings dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `Name=Start|End|PatternId` lines
    Legacy,
    /// `+Cmd="..."` command registrations
    Modern,
}

impl Dialect {
    /// Pick the dialect of a base-settings document.
    pub fn sniff(text: &str) -> Self {
        if MODERN_HEADERS.iter().any(|h| text.contains(h)) {
            Dialect::Modern
        } else {
            Dialect::Legacy
        }
    }

    fn name(self) -> &'static str {
        match self {
            Dialect::Legacy => "legacy",
            Dialect::Modern => "modern",
        }
    }
}

/// Parser for base-settings documents.
pub struct EngineConfigReader;

impl EngineConfigReader {
    /// Parse a base-settings document into section definitions.
    pub fn parse(text: &str, version: &str) -> EngineConfig {
        let dialect = Dialect::sniff(text);
        let sections = match dialect {
            Dialect::Legacy => parse_legacy(text),
            Dialect::Modern => parse_modern(text),
        };
        log::debug!(
            "read {} sections from {} base settings for {}",
            sections.len(),
            dialect.name(),
            version
        );

        EngineConfig {
            version: version.to_string(),
            description: format!("Unreal Engine {} ({} dialect)", version, dialect.name()),
            sections,
        }
    }

    /// Check a configuration for structural problems.
    ///
    /// Returns one human-readable message per problem; an empty list means
    /// the configuration is sound.
    pub fn validate(config: &EngineConfig) -> Vec<String> {
        let mut problems = Vec::new();

        if config.version.trim().is_empty() {
            problems.push("configuration has no version".to_string());
        }
        if config.sections.is_empty() {
            problems.push("configuration has no sections".to_string());
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, section) in config.sections.iter().enumerate() {
            let label = if section.name.is_empty() {
                format!("section #{}", index + 1)
            } else {
                format!("section '{}'", section.name)
            };
            if section.name.trim().is_empty() {
                problems.push(format!("{} has no name", label));
            }
            if section.start_pattern.trim().is_empty() {
                problems.push(format!("{} has no start pattern", label));
            }
            if section.end_pattern.trim().is_empty() {
                problems.push(format!("{} has no end pattern", label));
            }

            if section.name.is_empty() {
                continue;
            }
            let count = seen.entry(section.name.as_str()).or_insert(0);
            *count += 1;
            if *count > 1 {
                problems.push(format!("duplicate section name '{}'", section.name));
            }
        }

        problems
    }
}

fn parse_legacy(text: &str) -> Vec<SectionDefinition> {
    let mut sections = Vec::new();
    let mut in_block = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if is_header(line) {
            in_block = line == LEGACY_HEADER;
            continue;
        }
        if !in_block {
            continue;
        }
        if let Some(section) = parse_legacy_line(line) {
            sections.push(section);
        }
    }

    sections
}

fn parse_legacy_line(line: &str) -> Option<SectionDefinition> {
    let (name, rest) = line.split_once('=')?;
    let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
    if fields.len() < 2 {
        log::debug!("skipping legacy section line without end marker: {}", line);
        return None;
    }

    let mut section = SectionDefinition::new(name.trim(), fields[0], fields[1]);
    if let Some(id) = fields.get(2).filter(|id| !id.is_empty()) {
        section.parse_pattern_id = Some(id.to_string());
    }
    Some(section)
}

fn parse_modern(text: &str) -> Vec<SectionDefinition> {
    let mut sections = Vec::new();
    let mut in_block = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if is_header(line) {
            in_block = MODERN_HEADERS.contains(&line);
            continue;
        }
        if !in_block {
            continue;
        }
        let Some(command) = line.strip_prefix(COMMAND_PREFIX) else {
            continue;
        };
        let command = command.trim().trim_matches('"').trim();
        if command.is_empty() {
            continue;
        }
        sections.push(command_section(command));
    }

    sections
}

/// Build the section definition for a registered memreport command.
pub fn command_section(command: &str) -> SectionDefinition {
    let escaped = regex::escape(command);
    SectionDefinition::new(
        command,
        format!("MemReport: Begin command \"{}\"", escaped),
        format!("MemReport: End command \"{}\"", escaped),
    )
    .with_pattern_id(derive_pattern_id(command))
}

/// Derive the filesystem-safe pattern id of a command.
///
/// Lower-cases the command, replaces reserved characters and dots with `_`
/// and collapses each whitespace run into a single `_`.
pub fn derive_pattern_id(command: &str) -> String {
    let mut id = String::with_capacity(command.len());
    let mut in_whitespace = false;

    for c in command.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if RESERVED_CHARS.contains(&c) {
            id.push('_');
        } else {
            id.push(c);
        }
    }

    id
}

fn is_header(line: &str) -> bool {
    line.starts_with('[') && line.ends_with(']')
}

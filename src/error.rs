//! Error types for the memreport library.

use std::io;
use thiserror::Error;

/// Result type alias for memreport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while resolving configuration or parsing a report.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading report files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The base settings for an engine version could not be loaded.
    #[error("Failed to load base settings for engine version {version}: {source}")]
    ConfigUnavailable {
        /// Engine version tag
        version: String,
        /// Underlying load failure
        #[source]
        source: io::Error,
    },

    /// The base settings were loaded but are not usable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The engine version tag is not one of the supported versions.
    #[error("Unsupported engine version: {0}")]
    UnsupportedVersion(String),

    /// A section marker or table row pattern is malformed.
    #[error("Invalid pattern in {context}: {message}")]
    InvalidPattern {
        /// Section (and table) the pattern belongs to
        context: String,
        /// What is wrong with it
        message: String,
    },

    /// A table body line did not match the row pattern.
    #[error("Line in table '{table}' does not match its row pattern: {line}")]
    UnmatchedRow {
        /// Table name (or section name when the table is unnamed)
        table: String,
        /// The offending line, trimmed
        line: String,
    },

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn invalid_pattern(context: impl Into<String>, err: impl ToString) -> Self {
        Error::InvalidPattern {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

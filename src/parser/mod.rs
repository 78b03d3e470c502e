//! Memreport parsing module.

mod document_parser;
mod options;
mod table;

pub(crate) use document_parser::compile_section;
pub use document_parser::{is_echo_line, normalize_line_endings, strip_echo_lines, DocumentParser};
pub use options::{ParseOptions, UnmatchedLines};

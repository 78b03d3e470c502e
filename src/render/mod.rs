//! Rendering module for converting parsed reports to output formats.

mod json;

pub use json::{to_json, JsonFormat};

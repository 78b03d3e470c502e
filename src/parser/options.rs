//! Parsing options and configuration.

/// Options for parsing memreport documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// What to do with table body lines the row pattern does not match
    pub unmatched_lines: UnmatchedLines,

    /// Yield to the async runtime after this many sections (0 = never)
    pub yield_every: usize,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unmatched line policy.
    pub fn with_unmatched_lines(mut self, policy: UnmatchedLines) -> Self {
        self.unmatched_lines = policy;
        self
    }

    /// Fail the parse on any unmatched table line.
    pub fn strict(mut self) -> Self {
        self.unmatched_lines = UnmatchedLines::Fail;
        self
    }

    /// Drop unmatched table lines (the default).
    pub fn lenient(mut self) -> Self {
        self.unmatched_lines = UnmatchedLines::Drop;
        self
    }

    /// Set how many sections are parsed between yields.
    pub fn with_yield_every(mut self, sections: usize) -> Self {
        self.yield_every = sections;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            unmatched_lines: UnmatchedLines::Drop,
            yield_every: 5,
        }
    }
}

/// Handling of non-blank table body lines that a row pattern does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedLines {
    /// Skip the line
    #[default]
    Drop,
    /// Fail the whole parse
    Fail,
    /// Keep the trimmed line as a single-cell row
    Raw,
}

use serde::{Deserialize, Serialize};

/// A position in the script source, as handed over by the front end.
///
/// Both fields are 1-based. Synthesized nodes carry no location at all
/// (`Option<Location>::None`) rather than a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Location {
    /// The line number of the location.
    pub line: usize,
    /// The column number of the location.
    pub column: usize,
}

impl Location {
    /// Creates a new `Location`.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

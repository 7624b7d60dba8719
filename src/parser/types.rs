use serde::{Deserialize, Serialize};

/// Active statement separator while scanning a span of script text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Statements end at the physical newline (`#delimit cr`, the default).
    Newline,
    /// Statements end at `;`; newlines are insignificant.
    Semicolon,
}

/// Kind of definition opened by an atomic block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// `program [define] ...` through the matching `end`.
    Program,
    /// `mata` / `mata:` through `end`.
    Mata,
    /// `python` / `python:` through `end`.
    Python,
    /// `forvalues`/`foreach`/`while ... {` through the closing `}` line.
    Loop,
}

impl BlockKind {
    /// The line that closes a block of this kind (compared against the
    /// whitespace-trimmed line).
    pub fn terminator(self) -> &'static str {
        match self {
            BlockKind::Program | BlockKind::Mata | BlockKind::Python => "end",
            BlockKind::Loop => "}",
        }
    }
}

/// How a statement unit must be handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// One line, or a run of consecutive non-block lines.
    Simple,
    /// A definition that must be submitted as one atomic unit.
    Block(BlockKind),
}

/// One executable unit produced by segmentation, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementUnit {
    pub text: String,
    pub kind: UnitKind,
}

impl StatementUnit {
    pub fn is_atomic(&self) -> bool {
        matches!(self.kind, UnitKind::Block(_))
    }

    /// Number of physical lines in the unit.
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

/// A statement decomposed into its `code [if ...] [in ...]` clauses.
///
/// Absent clauses are empty strings, never a tri-state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedClauses {
    pub code: String,
    pub condition: String,
    pub range: String,
}

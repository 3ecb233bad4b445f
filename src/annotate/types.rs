//! Annotated hunk lines.

use crate::session::RevisionInfo;

/// How a rendered line relates to the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

impl LineKind {
    pub fn marker(&self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Added => '+',
            LineKind::Removed => '-',
        }
    }
}

/// One diff line with its resolved authorship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkLine {
    pub kind: LineKind,
    /// Commit the line is attributed to: the introducing commit for context
    /// and added lines, the deleting commit for removed lines.
    pub revision: RevisionInfo,
    /// Path of the line in `revision`.
    pub filename: String,
    /// Line number in the starting revision, for context and removed lines.
    pub original_line: Option<u32>,
    /// Line number in the target revision, for context and added lines.
    pub final_line: Option<u32>,
    /// Line bytes as they appear in the diff.
    pub content: Vec<u8>,
    /// The attribution hit the boundary of the blamed history.
    pub boundary: bool,
}

/// Entry of an annotated hunk body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotatedLine {
    Line(HunkLine),
    /// Raw line passed through untouched, e.g. `\ No newline at end of file`.
    Marker(String),
}

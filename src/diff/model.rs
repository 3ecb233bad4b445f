//! Structured model of a parsed unified diff.

use crate::annotate::AnnotatedLine;

/// A `start,count` pair from a hunk descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    /// First line of the range (1-based; 0 when the side has no content).
    pub start: u32,
    /// Number of lines covered.
    pub count: u32,
}

impl HunkRange {
    pub fn new(start: u32, count: u32) -> Self {
        Self { start, count }
    }

    /// One past the last line of the range, or None if that overflows.
    pub fn end(&self) -> Option<u32> {
        self.start.checked_add(self.count)
    }

    pub fn contains(&self, line: u32) -> bool {
        line >= self.start && self.end().is_some_and(|end| line < end)
    }
}

/// Marker of one raw hunk body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawLineKind {
    /// ` ` unchanged line.
    Context,
    /// `+` line present only in the final revision.
    Added,
    /// `-` line present only in the original revision.
    Removed,
    /// `\ No newline at end of file`.
    NoNewline,
}

impl RawLineKind {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            ' ' => Some(Self::Context),
            '+' => Some(Self::Added),
            '-' => Some(Self::Removed),
            '\\' => Some(Self::NoNewline),
            _ => None,
        }
    }

    /// Whether the line exists in the original revision.
    pub fn in_original(&self) -> bool {
        matches!(self, Self::Context | Self::Removed)
    }

    /// Whether the line exists in the final revision.
    pub fn in_final(&self) -> bool {
        matches!(self, Self::Context | Self::Added)
    }
}

/// One line of a hunk body, split into marker and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub kind: RawLineKind,
    /// Bytes after the marker character, as git wrote them.
    pub content: Vec<u8>,
}

/// One contiguous changed region of a file diff.
#[derive(Debug, Clone)]
pub struct DiffHunk {
    /// The `@@ ... @@` line as emitted by git.
    pub header: String,
    pub original: HunkRange,
    pub final_range: HunkRange,
    pub lines: Vec<RawLine>,
    annotated: Option<Vec<AnnotatedLine>>,
}

impl DiffHunk {
    pub fn new(header: String, original: HunkRange, final_range: HunkRange) -> Self {
        Self {
            header,
            original,
            final_range,
            lines: Vec::new(),
            annotated: None,
        }
    }

    /// Attach the resolved attribution lines, replacing any earlier ones.
    pub fn attach(&mut self, lines: Vec<AnnotatedLine>) {
        self.annotated = Some(lines);
    }

    /// Annotated lines, or an empty slice if the hunk has not been annotated.
    pub fn annotated(&self) -> &[AnnotatedLine] {
        self.annotated.as_deref().unwrap_or(&[])
    }
}

/// One file's diff between two revisions.
#[derive(Debug, Clone)]
pub struct DiffFile {
    /// Path in the starting revision (repo-relative).
    pub original_name: String,
    /// Path in the final revision (repo-relative).
    pub final_name: String,
    pub starting_revision: String,
    pub final_revision: String,
    /// `diff` header, extended headers and the `---`/`+++` pair, verbatim.
    pub preamble: Vec<String>,
    /// File does not exist in the starting revision.
    pub is_new: bool,
    /// File does not exist in the final revision.
    pub is_deleted: bool,
    /// Git reported binary content; there are no hunks.
    pub is_binary: bool,
    pub hunks: Vec<DiffHunk>,
}

impl DiffFile {
    /// Name used for display and path filtering: the final name, unless the
    /// file was deleted.
    pub fn display_name(&self) -> &str {
        if self.is_deleted {
            &self.original_name
        } else {
            &self.final_name
        }
    }
}

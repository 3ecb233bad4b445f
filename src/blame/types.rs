//! Attribution records produced by line-porcelain blame.

use crate::session::RevisionInfo;

/// One source line's authorship record.
///
/// For a forward query `final_line` is the line number at the queried
/// revision and `original_line` the number in the reported commit. For a
/// reverse query (`--reverse start..rev`) `final_line` is numbered in
/// `start` and `original_line` in the last commit that still had the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributionEntry {
    pub revision: RevisionInfo,
    pub original_line: u32,
    pub final_line: u32,
    /// Path of the line in the reported commit.
    pub filename: String,
    /// `(commit, path)` from the `previous` key, if git printed one.
    pub previous: Option<(String, String)>,
    /// The reported commit is a boundary of the queried range.
    pub boundary: bool,
    /// Line content without the leading tab.
    pub content: String,
}

impl AttributionEntry {
    /// Full id of the reported commit.
    pub fn commit(&self) -> &str {
        &self.revision.id
    }
}

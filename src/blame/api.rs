//! Attribution queries: building the blame invocation and running it.

use super::parser::parse_line_porcelain;
use super::types::AttributionEntry;
use crate::diff::HunkRange;
use crate::error::Result;
use crate::session::AttributionSession;

/// One attribution request over a set of line ranges of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributionQuery {
    /// Revision the ranges are numbered in (forward), or the end of the walk
    /// (reverse).
    pub revision: String,
    pub filename: String,
    pub ranges: Vec<HunkRange>,
    /// Start of a reverse walk. Ranges are then numbered in this revision.
    pub reverse_from: Option<String>,
    /// Extra blame arguments.
    pub params: Vec<String>,
}

impl AttributionQuery {
    /// Attribute the lines as they exist at `revision`.
    pub fn forward(revision: &str, filename: &str, ranges: Vec<HunkRange>) -> Self {
        Self {
            revision: revision.to_string(),
            filename: filename.to_string(),
            ranges,
            reverse_from: None,
            params: Vec::new(),
        }
    }

    /// Find, for lines of `start`, the last commit on the way to `target`
    /// that still contained them.
    pub fn reverse(start: &str, target: &str, filename: &str, ranges: Vec<HunkRange>) -> Self {
        Self {
            revision: target.to_string(),
            filename: filename.to_string(),
            ranges,
            reverse_from: Some(start.to_string()),
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: &[String]) -> Self {
        self.params = params.to_vec();
        self
    }

    /// Blame arguments for this query, or `None` when no query should run:
    /// a range starting at 0 means the file does not exist on that side.
    pub fn to_args(&self) -> Option<Vec<String>> {
        if self.ranges.iter().any(|r| r.start == 0) {
            return None;
        }

        let mut ranges: Vec<HunkRange> =
            self.ranges.iter().copied().filter(|r| r.count > 0).collect();
        if ranges.is_empty() {
            return None;
        }
        ranges.sort_by_key(|r| r.start);

        let mut args = vec!["blame".to_string(), "--line-porcelain".to_string()];
        args.extend(self.params.iter().cloned());
        for range in &ranges {
            args.push("-L".to_string());
            args.push(format!("{},+{}", range.start, range.count));
        }
        match &self.reverse_from {
            Some(start) => {
                args.push("--reverse".to_string());
                args.push(format!("{}..{}", start, self.revision));
            }
            None => args.push(self.revision.clone()),
        }
        args.push("--".to_string());
        args.push(self.filename.clone());

        Some(args)
    }
}

/// Run one attribution query. Entries come back in ascending line order and
/// their commit metadata is added to the session cache.
pub fn query_attribution(
    session: &mut AttributionSession,
    query: &AttributionQuery,
) -> Result<Vec<AttributionEntry>> {
    let Some(args) = query.to_args() else {
        return Ok(Vec::new());
    };

    let output = session.git(&args)?;
    let entries = parse_line_porcelain(&output.stdout)?;
    for entry in &entries {
        session.remember_revision(&entry.revision);
    }

    Ok(entries)
}

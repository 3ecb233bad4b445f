//! Merge-aware deletion resolution.
//!
//! Reverse blame names the last commit in which a line still existed. When
//! that commit has several children in the range, any of them (or a commit
//! further down one of their lineages) may be the one that removed the line
//! for good. The resolver walks the graph, re-diffing candidates against the
//! starting revision, until it finds that commit.

use super::AttributionSession;
use crate::error::Result;
use crate::trace::{TraceAction, TraceEvent};
use serde_json::json;
use std::collections::HashSet;

impl AttributionSession {
    /// The commit in `start..target` after which `line` (as numbered in
    /// `start`) is gone, or `None` when no single commit can be named.
    ///
    /// Among independently deleting merge parents, the first in parent order
    /// wins.
    pub fn resolve_deletion_commit(
        &mut self,
        start: &str,
        target: &str,
        filename: &str,
        line: u32,
    ) -> Result<Option<String>> {
        let key = (
            start.to_string(),
            target.to_string(),
            filename.to_string(),
            line,
        );
        if let Some(known) = self.deletions.get(&key) {
            return Ok(known.clone());
        }

        let result = self.search_deletion(start, target, filename, line)?;
        self.deletions.insert(key, result.clone());

        self.trace(|| {
            TraceEvent::new(TraceAction::Resolve)
                .with_file(filename)
                .with_details(json!({
                    "start": start,
                    "target": target,
                    "line": line,
                    "commit": result,
                }))
        })?;

        Ok(result)
    }

    fn search_deletion(
        &mut self,
        start: &str,
        target: &str,
        filename: &str,
        line: u32,
    ) -> Result<Option<String>> {
        let revisions_target: HashSet<String> = self
            .revisions_between(start, target, None)?
            .into_iter()
            .collect();
        let revisions_for_file = self.revisions_between(start, target, Some(filename))?;

        let Some(candidate) = revisions_for_file.first().cloned() else {
            return Ok(None);
        };

        if self
            .resolve_line_in_revision(start, &candidate, filename, line)?
            .is_some()
        {
            return Ok(None);
        }

        // Parents outside the range sit on the clean side of history.
        for parent in self.parents(&candidate)? {
            if !revisions_target.contains(&parent) {
                continue;
            }
            if self
                .resolve_line_in_revision(start, &parent, filename, line)?
                .is_some()
            {
                continue;
            }
            if let Some(found) = self.resolve_deletion_commit(start, &parent, filename, line)? {
                return Ok(Some(found));
            }
        }

        Ok(Some(candidate))
    }

    /// Deleting commit for a removed line whose reverse attribution named
    /// `reported` (with `line` numbered in `reported`).
    ///
    /// A reported commit with a single, non-merge child in range has an
    /// unambiguous answer; anything else goes through the resolver.
    pub fn resolve_removed_line(
        &mut self,
        reported: &str,
        target: &str,
        filename: &str,
        line: u32,
    ) -> Result<Option<String>> {
        if reported == target {
            return Ok(None);
        }

        let children = self.children_in_range(reported, target)?;
        if let [only] = children.as_slice() {
            if self.parents(only)?.len() == 1 {
                return Ok(Some(only.clone()));
            }
        }

        self.resolve_deletion_commit(reported, target, filename, line)
    }
}

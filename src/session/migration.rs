//! Line migration: where does a line of one revision end up in a
//! descendant revision?

use super::AttributionSession;
use crate::diff::{DiffHunk, RawLineKind, migration_diff_args, parse_diff};
use crate::error::Result;

impl AttributionSession {
    /// Number of `line` (as numbered in `original`) in `final_revision`, or
    /// `None` when the line was deleted on the way.
    pub fn resolve_line_in_revision(
        &mut self,
        original: &str,
        final_revision: &str,
        filename: &str,
        line: u32,
    ) -> Result<Option<u32>> {
        if original == final_revision {
            return Ok(Some(line));
        }

        let key = (
            original.to_string(),
            final_revision.to_string(),
            filename.to_string(),
        );
        if !self.migration_diffs.contains_key(&key) {
            let args = migration_diff_args(original, final_revision, filename);
            let output = self.git(&args)?;
            let diff = parse_diff(&output.raw, original, final_revision)?
                .into_iter()
                .find(|f| f.original_name == filename || f.final_name == filename);
            self.migration_diffs.insert(key.clone(), diff);
        }

        Ok(match self.migration_diffs.get(&key) {
            Some(Some(diff)) => migrate_line(&diff.hunks, line),
            _ => Some(line),
        })
    }
}

/// Replay hunk arithmetic for `line` over hunks sorted by original start.
///
/// A hunk with an empty original range is an insertion after
/// `original.start`, so lines up to and including that start precede it.
pub fn migrate_line(hunks: &[DiffHunk], line: u32) -> Option<u32> {
    let mut offset: i64 = 0;

    for hunk in hunks {
        let original = hunk.original;
        let before = if original.count == 0 {
            line <= original.start
        } else {
            line < original.start
        };
        if before {
            return Some(shift(line, offset));
        }

        if original.contains(line) {
            let mut original_cursor = original.start;
            let mut final_cursor = hunk.final_range.start;
            for raw in &hunk.lines {
                match raw.kind {
                    RawLineKind::Context => {
                        if original_cursor == line {
                            return Some(final_cursor);
                        }
                        original_cursor += 1;
                        final_cursor += 1;
                    }
                    RawLineKind::Removed => {
                        if original_cursor == line {
                            return None;
                        }
                        original_cursor += 1;
                    }
                    RawLineKind::Added => final_cursor += 1,
                    RawLineKind::NoNewline => {}
                }
            }
            // The parser guarantees the body covers the whole range.
            return None;
        }

        offset += i64::from(hunk.final_range.count) - i64::from(original.count);
    }

    Some(shift(line, offset))
}

fn shift(line: u32, offset: i64) -> u32 {
    u32::try_from(i64::from(line) + offset).unwrap_or(0)
}

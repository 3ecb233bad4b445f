//! Lockstep walk of a hunk's raw lines and its two attribution streams.

use super::types::{AnnotatedLine, HunkLine, LineKind};
use crate::blame::AttributionEntry;
use crate::diff::{DiffFile, DiffHunk, RawLineKind};
use crate::error::{DifflameError, Result};
use crate::session::RevisionInfo;
use std::collections::VecDeque;

/// FIFO over one attribution stream that checks each entry lands on the
/// line the hunk expects.
struct Stream<'h> {
    name: &'static str,
    entries: VecDeque<AttributionEntry>,
    cursor: u32,
    hunk: &'h str,
}

impl Stream<'_> {
    fn take(&mut self) -> Result<AttributionEntry> {
        let entry = self.entries.pop_front().ok_or_else(|| {
            DifflameError::Desync(format!(
                "{} stream exhausted at line {} of hunk {}",
                self.name, self.cursor, self.hunk
            ))
        })?;
        if entry.final_line != self.cursor {
            return Err(DifflameError::Desync(format!(
                "{} stream reported line {} where hunk {} expects line {}",
                self.name, entry.final_line, self.hunk, self.cursor
            )));
        }
        self.cursor += 1;
        Ok(entry)
    }

    fn finish(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        Err(DifflameError::Desync(format!(
            "{} unused {} stream entries after hunk {}",
            self.entries.len(),
            self.name,
            self.hunk
        )))
    }
}

/// Attach authorship to every line of `hunk`.
///
/// `final_entries` attribute the hunk's final range, `original_entries` its
/// original range; both must be numbered so that `final_line` is the line
/// number on the respective side. `resolve_removed` maps a removed line's
/// entry to the commit shown for it.
pub fn correlate_hunk<F>(
    file: &DiffFile,
    hunk: &DiffHunk,
    final_entries: Vec<AttributionEntry>,
    original_entries: Vec<AttributionEntry>,
    mut resolve_removed: F,
) -> Result<Vec<AnnotatedLine>>
where
    F: FnMut(&AttributionEntry) -> Result<RevisionInfo>,
{
    let label = format!("{} in {}", hunk.header, file.display_name());
    let mut final_stream = Stream {
        name: "final",
        entries: final_entries.into(),
        cursor: hunk.final_range.start,
        hunk: &label,
    };
    let mut original_stream = Stream {
        name: "original",
        entries: original_entries.into(),
        cursor: hunk.original.start,
        hunk: &label,
    };

    let mut lines = Vec::with_capacity(hunk.lines.len());
    for raw in &hunk.lines {
        let line = match raw.kind {
            RawLineKind::Context => {
                let original_line = original_stream.cursor;
                original_stream.take()?;
                let entry = final_stream.take()?;
                HunkLine {
                    kind: LineKind::Context,
                    original_line: Some(original_line),
                    final_line: Some(entry.final_line),
                    revision: entry.revision,
                    filename: entry.filename,
                    content: raw.content.clone(),
                    boundary: entry.boundary,
                }
            }
            RawLineKind::Added => {
                let entry = final_stream.take()?;
                HunkLine {
                    kind: LineKind::Added,
                    original_line: None,
                    final_line: Some(entry.final_line),
                    revision: entry.revision,
                    filename: entry.filename,
                    content: raw.content.clone(),
                    boundary: entry.boundary,
                }
            }
            RawLineKind::Removed => {
                let entry = original_stream.take()?;
                let revision = resolve_removed(&entry)?;
                HunkLine {
                    kind: LineKind::Removed,
                    original_line: Some(entry.final_line),
                    final_line: None,
                    boundary: entry.boundary && revision.id == entry.revision.id,
                    revision,
                    filename: entry.filename,
                    content: raw.content.clone(),
                }
            }
            RawLineKind::NoNewline => {
                lines.push(AnnotatedLine::Marker(format!(
                    "\\{}",
                    String::from_utf8_lossy(&raw.content)
                )));
                continue;
            }
        };
        lines.push(AnnotatedLine::Line(line));
    }

    final_stream.finish()?;
    original_stream.finish()?;
    Ok(lines)
}

//! Diff annotation pipeline.
//!
//! Takes a revision range, runs the range diff and, for every hunk, pulls
//! the final and original attribution streams, correlates them with the raw
//! hunk lines and attaches the result to the hunk.
//!
//! # Direction
//!
//! When the starting revision is an ancestor of the target, removed lines
//! come from a reverse blame over `start..target` and are then narrowed to
//! their deleting commit. Otherwise there is no forward walk to follow, so
//! removed lines are attributed by a forward blame at the starting revision
//! (the commit that introduced the content the target lacks).

mod correlate;
mod render;
mod types;


pub use correlate::correlate_hunk;
pub use render::{ColumnWidths, RenderOptions, render};
pub use types::{AnnotatedLine, HunkLine, LineKind};

use crate::blame::{AttributionEntry, AttributionQuery, query_attribution};
use crate::diff::{DiffFile, DiffParser, range_diff_args};
use crate::error::Result;
use crate::session::{AttributionSession, RevisionInfo};
use crate::trace::{TraceAction, TraceEvent};
use globset::GlobSet;
use serde_json::json;

/// What to annotate.
#[derive(Debug, Clone, Default)]
pub struct AnnotateRequest {
    pub start: String,
    pub target: String,
    /// Repo-relative path filters.
    pub paths: Vec<String>,
    pub diff_params: Vec<String>,
    pub blame_params: Vec<String>,
    /// Files whose display name matches are skipped.
    pub exclude: Option<GlobSet>,
}

/// Diff `start..target` and annotate every hunk of every file.
pub fn annotate_range(
    session: &mut AttributionSession,
    request: &AnnotateRequest,
) -> Result<Vec<DiffFile>> {
    let start = session.full_id(&request.start)?;
    let target = session.full_id(&request.target)?;
    let forward = session.is_forward(&start, &target)?;

    let args = range_diff_args(&start, &target, &request.diff_params, &request.paths);
    let output = session.git(&args)?;

    let range = Range {
        start: &start,
        target: &target,
        forward,
        blame_params: &request.blame_params,
    };

    let mut files = Vec::new();
    for file in DiffParser::new(&output.raw, &start, &target) {
        let mut file = file?;

        if let Some(exclude) = &request.exclude
            && exclude.is_match(file.display_name())
        {
            session.trace(|| {
                TraceEvent::new(TraceAction::File)
                    .with_file(file.display_name())
                    .with_details(json!({ "skipped": "excluded" }))
            })?;
            continue;
        }

        annotate_file(session, &range, &mut file)?;
        session.trace(|| {
            TraceEvent::new(TraceAction::File)
                .with_file(file.display_name())
                .with_details(json!({ "hunks": file.hunks.len() }))
        })?;
        files.push(file);
    }

    Ok(files)
}

struct Range<'a> {
    start: &'a str,
    target: &'a str,
    forward: bool,
    blame_params: &'a [String],
}

fn annotate_file(
    session: &mut AttributionSession,
    range: &Range<'_>,
    file: &mut DiffFile,
) -> Result<()> {
    for index in 0..file.hunks.len() {
        let hunk = &file.hunks[index];

        let final_query =
            AttributionQuery::forward(range.target, &file.final_name, vec![hunk.final_range])
                .with_params(range.blame_params);
        let original_query = if range.forward {
            AttributionQuery::reverse(
                range.start,
                range.target,
                &file.original_name,
                vec![hunk.original],
            )
        } else {
            AttributionQuery::forward(range.start, &file.original_name, vec![hunk.original])
        }
        .with_params(range.blame_params);

        let final_entries = query_attribution(session, &final_query)?;
        let original_entries = query_attribution(session, &original_query)?;

        let lines = correlate_hunk(file, hunk, final_entries, original_entries, |entry| {
            resolve_removed(session, range, entry)
        })?;
        file.hunks[index].attach(lines);
    }
    Ok(())
}

/// Commit shown for a removed line.
fn resolve_removed(
    session: &mut AttributionSession,
    range: &Range<'_>,
    entry: &AttributionEntry,
) -> Result<RevisionInfo> {
    if !range.forward {
        return Ok(entry.revision.clone());
    }

    let deleting = session.resolve_removed_line(
        entry.commit(),
        range.target,
        &entry.filename,
        entry.original_line,
    )?;
    match deleting {
        Some(id) => session.revision_info(&id),
        // Inconclusive: show the commit the reverse walk reported.
        None => Ok(entry.revision.clone()),
    }
}

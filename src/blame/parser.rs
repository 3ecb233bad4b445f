//! Parser for `git blame --line-porcelain` (and plain `--porcelain`) output.
//!
//! Each record looks like:
//!
//! ```text
//! <hex> <orig_line> <final_line>[ <group_size>]
//! author <name>
//! author-mail <<email>>
//! author-time <epoch>
//! author-tz <tz>
//! committer <name>
//! committer-mail <<email>>
//! committer-time <epoch>
//! committer-tz <tz>
//! summary <text>
//! [previous <hex> <path>]
//! [boundary]
//! filename <path>
//! \t<line content>
//! ```
//!
//! Plain porcelain prints the metadata block only the first time a commit
//! appears, so later records reuse what was seen earlier. Paths with unusual
//! characters arrive C-quoted and are unquoted here.

use super::types::AttributionEntry;
use crate::diff::helpers::unquote_path;
use crate::error::{DifflameError, Result};
use crate::session::RevisionInfo;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9a-f]{40}|[0-9a-f]{64}) (\d+) (\d+)(?: (\d+))?$")
        .expect("blame header regex must compile")
});

struct PendingRecord {
    revision: RevisionInfo,
    original_line: u32,
    final_line: u32,
    filename: Option<String>,
    previous: Option<(String, String)>,
    boundary: bool,
    started_at: usize,
}

/// Parse every record of a blame invocation, in output order.
pub fn parse_line_porcelain(output: &str) -> Result<Vec<AttributionEntry>> {
    let mut entries = Vec::new();
    let mut seen: HashMap<String, (RevisionInfo, String)> = HashMap::new();
    let mut pending: Option<PendingRecord> = None;

    for (index, line) in output.split_terminator('\n').enumerate() {
        let line_number = index + 1;

        if let Some(content) = line.strip_prefix('\t') {
            let record = pending.take().ok_or_else(|| {
                malformed(line_number, "content line outside of a record")
            })?;
            let filename = match record.filename {
                Some(filename) => filename,
                None => seen
                    .get(&record.revision.id)
                    .map(|(_, filename)| filename.clone())
                    .ok_or_else(|| {
                        malformed(record.started_at, "record without a filename")
                    })?,
            };
            seen.insert(
                record.revision.id.clone(),
                (record.revision.clone(), filename.clone()),
            );
            entries.push(AttributionEntry {
                revision: record.revision,
                original_line: record.original_line,
                final_line: record.final_line,
                filename,
                previous: record.previous,
                boundary: record.boundary,
                content: content.to_string(),
            });
            continue;
        }

        if pending.is_none() {
            if !line.is_empty() {
                pending = Some(parse_header(line, line_number, &seen)?);
            }
            continue;
        }
        let Some(record) = pending.as_mut() else {
            continue;
        };

        if HEADER_RE.is_match(line) {
            return Err(malformed(
                record.started_at,
                "record ended without a content line",
            ));
        }
        apply_metadata(record, line, line_number)?;
    }

    if let Some(record) = pending {
        return Err(malformed(
            record.started_at,
            "record ended without a content line",
        ));
    }

    Ok(entries)
}

fn parse_header(
    line: &str,
    line_number: usize,
    seen: &HashMap<String, (RevisionInfo, String)>,
) -> Result<PendingRecord> {
    let caps = HEADER_RE
        .captures(line)
        .ok_or_else(|| malformed(line_number, format!("unexpected header '{}'", line)))?;

    let id = caps[1].to_string();
    let original_line = parse_number(&caps[2], line_number)?;
    let final_line = parse_number(&caps[3], line_number)?;

    let revision = match seen.get(&id) {
        Some((revision, _)) => revision.clone(),
        None => RevisionInfo {
            id,
            ..Default::default()
        },
    };

    Ok(PendingRecord {
        revision,
        original_line,
        final_line,
        filename: None,
        previous: None,
        boundary: false,
        started_at: line_number,
    })
}

fn apply_metadata(record: &mut PendingRecord, line: &str, line_number: usize) -> Result<()> {
    let (key, value) = line.split_once(' ').unwrap_or((line, ""));
    let revision = &mut record.revision;

    match key {
        "author" => revision.author.name = value.to_string(),
        "author-mail" => revision.author.mail = strip_brackets(value),
        "author-time" => revision.author.time = parse_time(value, line_number)?,
        "author-tz" => revision.author.tz = value.to_string(),
        "committer" => revision.committer.name = value.to_string(),
        "committer-mail" => revision.committer.mail = strip_brackets(value),
        "committer-time" => revision.committer.time = parse_time(value, line_number)?,
        "committer-tz" => revision.committer.tz = value.to_string(),
        "summary" => revision.summary = value.to_string(),
        "filename" => record.filename = Some(unquote_path(value)),
        "boundary" => record.boundary = true,
        "previous" => {
            let (commit, path) = value
                .split_once(' ')
                .ok_or_else(|| malformed(line_number, "previous without a path"))?;
            record.previous = Some((commit.to_string(), unquote_path(path)));
        }
        // Newer git versions may add keys.
        _ => {}
    }

    Ok(())
}

fn strip_brackets(value: &str) -> String {
    value
        .strip_prefix('<')
        .and_then(|v| v.strip_suffix('>'))
        .unwrap_or(value)
        .to_string()
}

fn parse_number(value: &str, line_number: usize) -> Result<u32> {
    value
        .parse()
        .map_err(|_| malformed(line_number, format!("line number '{}' out of range", value)))
}

fn parse_time(value: &str, line_number: usize) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| malformed(line_number, format!("invalid timestamp '{}'", value)))
}

fn malformed(line_number: usize, message: impl Into<String>) -> DifflameError {
    DifflameError::MalformedAttribution(format!("line {}: {}", line_number, message.into()))
}

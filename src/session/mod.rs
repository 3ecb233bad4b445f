//! Attribution session: the memo tables and commit-graph lookups shared by
//! one difflame invocation.
//!
//! All caches are read-through and written once per key. History does not
//! change while a run is in progress, so nothing is ever invalidated; the
//! session is simply dropped at the end of the invocation.

mod deletion;
mod migration;
mod revision;


pub use migration::migrate_line;
pub use revision::{Identity, RevisionInfo};

use crate::diff::DiffFile;
use crate::error::{DifflameError, Result};
use crate::git::{GitOutput, run_git};
use crate::trace::{TraceAction, TraceEvent, Tracer};
use revision::SHOW_FORMAT;
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

type RangeKey = (String, String, Option<String>);
type MigrationKey = (String, String, String);
type DeletionKey = (String, String, String, u32);

/// Owns every cache for one top-level invocation.
pub struct AttributionSession {
    repo_root: PathBuf,
    tracer: Tracer,
    full_ids: HashMap<String, String>,
    revision_infos: HashMap<String, RevisionInfo>,
    parents: HashMap<String, Vec<String>>,
    ranges: HashMap<RangeKey, Vec<String>>,
    migration_diffs: HashMap<MigrationKey, Option<DiffFile>>,
    deletions: HashMap<DeletionKey, Option<String>>,
}

impl AttributionSession {
    pub fn new<P: AsRef<Path>>(repo_root: P, tracer: Tracer) -> Self {
        Self {
            repo_root: repo_root.as_ref().to_path_buf(),
            tracer,
            full_ids: HashMap::new(),
            revision_infos: HashMap::new(),
            parents: HashMap::new(),
            ranges: HashMap::new(),
            migration_diffs: HashMap::new(),
            deletions: HashMap::new(),
        }
    }

    /// Run one external git query in the repository, tracing it.
    pub fn git(&mut self, args: &[String]) -> Result<GitOutput> {
        let started = Instant::now();
        let result = run_git(&self.repo_root, args);

        if self.tracer.is_enabled() {
            let event = TraceEvent::new(TraceAction::Query).with_details(json!({
                "args": args,
                "duration_ms": started.elapsed().as_millis() as u64,
                "ok": result.is_ok(),
            }));
            self.tracer.record(&event)?;
        }

        result
    }

    /// Record a trace event if tracing is enabled.
    pub fn trace(&mut self, event: impl FnOnce() -> TraceEvent) -> Result<()> {
        if self.tracer.is_enabled() {
            let event = event();
            self.tracer.record(&event)?;
        }
        Ok(())
    }

    /// Resolve a short id or ref to a full commit id.
    ///
    /// An unknown revision is a user error (exit 1).
    pub fn full_id(&mut self, rev: &str) -> Result<String> {
        if let Some(id) = self.full_ids.get(rev) {
            return Ok(id.clone());
        }

        let args = vec![
            "rev-parse".to_string(),
            "--verify".to_string(),
            "--quiet".to_string(),
            format!("{}^{{commit}}", rev),
        ];
        let id = match self.git(&args) {
            Ok(output) if !output.is_empty() => output.trimmed().to_string(),
            Ok(_) => return Err(unknown_revision(rev)),
            Err(DifflameError::ExternalQuery { status, .. }) if status > 0 => {
                return Err(unknown_revision(rev));
            }
            Err(e) => return Err(e),
        };

        self.full_ids.insert(rev.to_string(), id.clone());
        Ok(id)
    }

    /// Commit metadata for a full id, fetched on first use.
    pub fn revision_info(&mut self, id: &str) -> Result<RevisionInfo> {
        if let Some(info) = self.revision_infos.get(id) {
            return Ok(info.clone());
        }

        let args = vec![
            "show".to_string(),
            "-s".to_string(),
            "--no-color".to_string(),
            "--date=format:%z".to_string(),
            SHOW_FORMAT.to_string(),
            id.to_string(),
        ];
        let output = self.git(&args)?;
        let info = RevisionInfo::from_show_output(&output.stdout).ok_or_else(|| {
            DifflameError::MalformedAttribution(format!(
                "cannot read commit metadata for {}",
                id
            ))
        })?;

        self.revision_infos.insert(id.to_string(), info.clone());
        Ok(info)
    }

    /// Seed the metadata cache with revisions already known from blame output.
    pub fn remember_revision(&mut self, info: &RevisionInfo) {
        if !self.revision_infos.contains_key(&info.id) {
            self.revision_infos.insert(info.id.clone(), info.clone());
        }
    }

    /// Direct parents of a commit, in parent order.
    pub fn parents(&mut self, id: &str) -> Result<Vec<String>> {
        if let Some(parents) = self.parents.get(id) {
            return Ok(parents.clone());
        }

        let args = vec![
            "rev-list".to_string(),
            "--parents".to_string(),
            "-n".to_string(),
            "1".to_string(),
            id.to_string(),
        ];
        let output = self.git(&args)?;
        let parents: Vec<String> = output
            .trimmed()
            .split_whitespace()
            .skip(1)
            .map(str::to_string)
            .collect();

        self.parents.insert(id.to_string(), parents.clone());
        Ok(parents)
    }

    /// Commits reachable from `target` but not from `start`, most recent
    /// first, optionally limited to commits touching `filename`.
    pub fn revisions_between(
        &mut self,
        start: &str,
        target: &str,
        filename: Option<&str>,
    ) -> Result<Vec<String>> {
        let key = (
            start.to_string(),
            target.to_string(),
            filename.map(str::to_string),
        );
        if let Some(revisions) = self.ranges.get(&key) {
            return Ok(revisions.clone());
        }

        let mut args = vec!["rev-list".to_string(), "--topo-order".to_string()];
        // Path limiting rewrites parents, so only the unfiltered listing
        // doubles as a parent-list source.
        if filename.is_none() {
            args.push("--parents".to_string());
        }
        args.push(format!("{}..{}", start, target));
        if let Some(filename) = filename {
            args.push("--".to_string());
            args.push(filename.to_string());
        }

        let output = self.git(&args)?;
        let mut revisions = Vec::new();
        for line in output.lines() {
            let mut ids = line.split_whitespace();
            let Some(id) = ids.next() else { continue };
            if filename.is_none() {
                let parents: Vec<String> = ids.map(str::to_string).collect();
                self.parents.entry(id.to_string()).or_insert(parents);
            }
            revisions.push(id.to_string());
        }

        self.ranges.insert(key, revisions.clone());
        Ok(revisions)
    }

    /// Children of `commit` among the commits in `commit..target`.
    pub fn children_in_range(&mut self, commit: &str, target: &str) -> Result<Vec<String>> {
        let revisions = self.revisions_between(commit, target, None)?;
        let mut children = Vec::new();
        for revision in revisions {
            if self.parents(&revision)?.iter().any(|p| p == commit) {
                children.push(revision);
            }
        }
        Ok(children)
    }

    /// Lowest common ancestor of two commits, if any.
    pub fn merge_base(&mut self, a: &str, b: &str) -> Result<Option<String>> {
        let args = vec!["merge-base".to_string(), a.to_string(), b.to_string()];
        match self.git(&args) {
            Ok(output) if !output.is_empty() => Ok(Some(output.trimmed().to_string())),
            Ok(_) => Ok(None),
            // merge-base exits 1 when the histories are unrelated.
            Err(DifflameError::ExternalQuery { status: 1, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether `start..target` is a forward range (`start` is an ancestor of
    /// `target`).
    pub fn is_forward(&mut self, start: &str, target: &str) -> Result<bool> {
        Ok(self.merge_base(start, target)?.as_deref() == Some(start))
    }
}

fn unknown_revision(rev: &str) -> DifflameError {
    DifflameError::UserError(format!("unknown revision '{}'", rev))
}

//! Trace logging for difflame.
//!
//! Every external git query and every deletion resolution can be recorded as
//! an append-only NDJSON event (one JSON object per line). Tracing is off
//! unless a trace file is configured; `--verbose` additionally echoes a
//! one-line summary of each event to stderr.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `query`, `resolve`, or `file`
//! - `actor`: `user@HOST`
//! - `file`: optional repo-relative path the event concerns
//! - `details`: freeform object with action-specific details

use crate::error::{DifflameError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ACTOR: LazyLock<String> = LazyLock::new(get_actor_string);

/// Actions that can be traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceAction {
    /// An external git query was issued.
    Query,
    /// A removed line's deleting commit was resolved.
    Resolve,
    /// A file from the diff was annotated or skipped.
    File,
}

impl std::fmt::Display for TraceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceAction::Query => write!(f, "query"),
            TraceAction::Resolve => write!(f, "resolve"),
            TraceAction::File => write!(f, "file"),
        }
    }
}

/// A single trace record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub ts: DateTime<Utc>,
    pub action: TraceAction,
    pub actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub details: Value,
}

impl TraceEvent {
    pub fn new(action: TraceAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: ACTOR.clone(),
            file: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            DifflameError::UserError(format!("failed to serialize trace event to JSON: {}", e))
        })
    }

    fn summary(&self) -> String {
        match &self.file {
            Some(file) => format!("{} {} {}", self.action, file, self.details),
            None => format!("{} {}", self.action, self.details),
        }
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Destination for trace events.
#[derive(Debug, Default)]
pub struct Tracer {
    sink: Option<(PathBuf, File)>,
    verbose: bool,
}

impl Tracer {
    /// A tracer that records nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Open (or create) `trace_file` for appending.
    pub fn new(trace_file: Option<&Path>, verbose: bool) -> Result<Self> {
        let sink = match trace_file {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        DifflameError::UserError(format!(
                            "failed to open trace file '{}': {}",
                            path.display(),
                            e
                        ))
                    })?;
                Some((path.to_path_buf(), file))
            }
            None => None,
        };

        Ok(Self { sink, verbose })
    }

    /// Whether recording an event has any effect.
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some() || self.verbose
    }

    pub fn record(&mut self, event: &TraceEvent) -> Result<()> {
        if self.verbose {
            eprintln!("[difflame] {}", event.summary());
        }

        if let Some((path, file)) = self.sink.as_mut() {
            let line = event.to_ndjson_line()?;
            writeln!(file, "{}", line).map_err(|e| {
                DifflameError::UserError(format!(
                    "failed to write trace file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }
}

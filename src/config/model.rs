//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for difflame.
///
/// This struct represents the contents of `.difflame.yaml` (or the file named
/// by `$DIFFLAME_CONFIG`). Unknown fields in the YAML are ignored for forward
/// compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Output settings
    // =========================================================================
    /// When to color output.
    #[serde(default)]
    pub color: ColorMode,

    /// Show the author name column.
    #[serde(default = "default_true")]
    pub show_name: bool,

    /// Show the author mail column.
    #[serde(default)]
    pub show_mail: bool,

    /// Show the author date column.
    #[serde(default = "default_true")]
    pub show_date: bool,

    /// Show one-line commit summaries above changed lines.
    #[serde(default = "default_true")]
    pub hints: bool,

    /// Abbreviated commit id length.
    #[serde(default = "default_abbrev")]
    pub abbrev: usize,

    // =========================================================================
    // Query settings
    // =========================================================================
    /// Extra `git diff` arguments (shell-words syntax).
    #[serde(default)]
    pub diff_options: String,

    /// Extra `git blame` arguments (shell-words syntax).
    #[serde(default)]
    pub blame_options: String,

    /// Glob patterns of files to leave out of the annotated diff.
    #[serde(default)]
    pub exclude: Vec<String>,

    // =========================================================================
    // Tracing
    // =========================================================================
    /// Append NDJSON trace events to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: ColorMode::default(),
            show_name: default_true(),
            show_mail: false,
            show_date: default_true(),
            hints: default_true(),
            abbrev: default_abbrev(),
            diff_options: String::new(),
            blame_options: String::new(),
            exclude: Vec::new(),
            trace_file: None,
        }
    }
}

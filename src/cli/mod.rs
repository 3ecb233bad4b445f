//! CLI argument parsing for difflame.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the argument structure; the run itself lives in the
//! `commands` module.

use crate::error::{DifflameError, Result};
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Difflame: a diff annotated with blame.
///
/// Shows the diff between two revisions where every line carries the commit
/// that introduced it, or for removed lines, the commit that deleted it.
#[derive(Parser, Debug)]
#[command(name = "difflame")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Revisions to compare: `A B`, `A..B`, or `A` (meaning `A..HEAD`).
    #[arg(value_name = "REV", required = true, num_args = 1..=2)]
    pub revisions: Vec<String>,

    /// Limit the diff to these paths.
    #[arg(value_name = "PATH", last = true)]
    pub paths: Vec<String>,

    /// Color the output.
    #[arg(long, overrides_with = "no_color")]
    pub color: bool,

    /// Never color the output.
    #[arg(long, overrides_with = "color")]
    pub no_color: bool,

    /// Show author names.
    #[arg(long, overrides_with = "no_name")]
    pub name: bool,

    /// Hide author names.
    #[arg(long, overrides_with = "name")]
    pub no_name: bool,

    /// Show author mail addresses.
    #[arg(long, overrides_with = "no_mail")]
    pub mail: bool,

    /// Hide author mail addresses.
    #[arg(long, overrides_with = "mail")]
    pub no_mail: bool,

    /// Show author dates.
    #[arg(long, overrides_with = "no_date")]
    pub date: bool,

    /// Hide author dates.
    #[arg(long, overrides_with = "date")]
    pub no_date: bool,

    /// Show commit summaries above changed lines.
    #[arg(long, overrides_with = "no_hints")]
    pub hints: bool,

    /// Hide commit summaries.
    #[arg(long, overrides_with = "hints")]
    pub no_hints: bool,

    /// Extra argument for `git diff` (repeatable). `-dp=<ARG>` also works.
    #[arg(
        long = "diff-param",
        visible_alias = "dp",
        value_name = "ARG",
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub diff_params: Vec<String>,

    /// Extra argument for `git blame` (repeatable). `-bp=<ARG>` also works.
    #[arg(
        long = "blame-param",
        visible_alias = "bp",
        value_name = "ARG",
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub blame_params: Vec<String>,

    /// Append NDJSON trace events to this file.
    #[arg(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Print a summary of every git query and resolution to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse_from(expand_short_params(std::env::args_os()))
    }

    /// The `(start, target)` pair named by the revision arguments.
    pub fn revision_range(&self) -> Result<(String, String)> {
        split_revisions(&self.revisions)
    }

    pub fn color_override(&self) -> Option<bool> {
        toggle(self.color, self.no_color)
    }

    pub fn name_override(&self) -> Option<bool> {
        toggle(self.name, self.no_name)
    }

    pub fn mail_override(&self) -> Option<bool> {
        toggle(self.mail, self.no_mail)
    }

    pub fn date_override(&self) -> Option<bool> {
        toggle(self.date, self.no_date)
    }

    pub fn hints_override(&self) -> Option<bool> {
        toggle(self.hints, self.no_hints)
    }
}

fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Split revision arguments into `(start, target)`.
///
/// Accepts `A B`, `A..B` (an empty side means `HEAD`), and a lone `A`,
/// which compares `A` with `HEAD`.
pub fn split_revisions(revisions: &[String]) -> Result<(String, String)> {
    match revisions {
        [single] => {
            if single.contains("...") {
                return Err(DifflameError::UserError(format!(
                    "symmetric range '{}' is not supported; use A..B",
                    single
                )));
            }
            match single.split_once("..") {
                Some((start, target)) => Ok((or_head(start), or_head(target))),
                None => Ok((single.clone(), "HEAD".to_string())),
            }
        }
        [start, target] => {
            if start.contains("..") || target.contains("..") {
                return Err(DifflameError::UserError(
                    "give either two revisions or a single A..B range".to_string(),
                ));
            }
            Ok((start.clone(), target.clone()))
        }
        _ => Err(DifflameError::UserError(
            "expected one or two revisions".to_string(),
        )),
    }
}

/// Rewrite the single-dash `-dp`/`-bp` spellings into `--diff-param` and
/// `--blame-param`. Paths after `--` and values of a preceding pass-through
/// flag are left alone.
pub fn expand_short_params<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut expanded = Vec::new();
    let mut takes_value = false;
    let mut in_paths = false;

    for arg in args {
        let arg: OsString = arg.into();
        if in_paths || takes_value {
            takes_value = false;
            expanded.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                in_paths = true;
                None
            }
            Some(text) => long_param(text),
            None => None,
        };
        let arg = rewritten.map(OsString::from).unwrap_or(arg);
        takes_value = matches!(
            arg.to_str(),
            Some("--diff-param" | "--dp" | "--blame-param" | "--bp")
        );
        expanded.push(arg);
    }

    expanded
}

fn long_param(arg: &str) -> Option<String> {
    for (short, long) in [("-dp", "--diff-param"), ("-bp", "--blame-param")] {
        if arg == short {
            return Some(long.to_string());
        }
        if let Some(value) = arg.strip_prefix(short).and_then(|rest| rest.strip_prefix('=')) {
            return Some(format!("{}={}", long, value));
        }
    }
    None
}

fn or_head(rev: &str) -> String {
    if rev.is_empty() {
        "HEAD".to_string()
    } else {
        rev.to_string()
    }
}

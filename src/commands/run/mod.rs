//! Implementation of a difflame run.
//!
//! Resolves the repository, merges config with command-line overrides, runs
//! the annotation pipeline over the requested range and renders the result
//! to stdout.

use crate::annotate::{AnnotateRequest, RenderOptions, annotate_range, render};
use crate::cli::Cli;
use crate::config::Config;
use crate::context::RepoContext;
use crate::error::Result;
use crate::session::AttributionSession;
use crate::trace::Tracer;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::PathBuf;

#[cfg(test)]
mod tests;

/// Everything a run needs, after config and command line are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub request: AnnotateRequest,
    pub render: RenderOptions,
    pub trace_file: Option<PathBuf>,
}

impl Settings {
    /// Merge `config` with the command line. Command-line flags win; extra
    /// diff and blame arguments from both sources are kept, config first.
    pub fn merge(config: &Config, cli: &Cli, ctx: &RepoContext, is_terminal: bool) -> Result<Self> {
        let (start, target) = cli.revision_range()?;

        let paths = cli
            .paths
            .iter()
            .map(|p| ctx.pathspec(p))
            .collect::<Result<Vec<_>>>()?;

        let mut diff_params = config.diff_params()?;
        diff_params.extend(cli.diff_params.iter().cloned());
        let mut blame_params = config.blame_params()?;
        blame_params.extend(cli.blame_params.iter().cloned());

        let request = AnnotateRequest {
            start,
            target,
            paths,
            diff_params,
            blame_params,
            exclude: config.exclude_globset()?,
        };

        let render = RenderOptions {
            color: cli
                .color_override()
                .unwrap_or_else(|| config.color.enabled(is_terminal)),
            show_name: cli.name_override().unwrap_or(config.show_name),
            show_mail: cli.mail_override().unwrap_or(config.show_mail),
            show_date: cli.date_override().unwrap_or(config.show_date),
            hints: cli.hints_override().unwrap_or(config.hints),
            abbrev: config.abbrev,
        };

        // A configured trace path is relative to the repository root, one
        // given on the command line to the invocation directory.
        let trace_file = match &cli.trace {
            Some(path) => Some(path.clone()),
            None => config.trace_file.as_ref().map(|p| ctx.repo_root.join(p)),
        };

        Ok(Self {
            request,
            render,
            trace_file,
        })
    }
}

/// Execute a run from the current directory, writing to stdout.
pub fn cmd_run(cli: &Cli) -> Result<()> {
    let ctx = RepoContext::resolve()?;

    let stdout = std::io::stdout();
    let is_terminal = stdout.is_terminal();
    let mut out = BufWriter::new(stdout.lock());

    execute(cli, &ctx, is_terminal, &mut out)
}

/// Execute a run in `ctx`, writing the annotated diff to `out`.
pub fn execute<W: Write>(
    cli: &Cli,
    ctx: &RepoContext,
    is_terminal: bool,
    out: &mut W,
) -> Result<()> {
    let config = Config::discover(&ctx.repo_root)?;
    let settings = Settings::merge(&config, cli, ctx, is_terminal)?;

    let tracer = Tracer::new(settings.trace_file.as_deref(), cli.verbose)?;
    let mut session = AttributionSession::new(&ctx.repo_root, tracer);

    let files = annotate_range(&mut session, &settings.request)?;
    render(&files, &settings.render, out)
}

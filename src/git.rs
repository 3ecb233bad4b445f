//! Git command runner for difflame.
//!
//! Provides a thin wrapper around git subprocesses with captured
//! stdout/stderr and structured error handling. Every external query made by
//! the attribution engine goes through `run_git`.

use crate::error::{DifflameError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output decoded as UTF-8, untouched otherwise. Diff and blame
    /// content is whitespace sensitive, so callers trim when they need to.
    pub stdout: String,
    /// Standard output as git wrote it. File content need not be UTF-8.
    pub raw: Vec<u8>,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            raw: output.stdout.clone(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout holds nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.stdout.trim().is_empty()
    }

    /// Returns stdout trimmed of surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Returns the non-empty stdout lines.
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().filter(|l| !l.is_empty()).collect()
    }
}

/// Run a git command with the specified working directory.
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(DifflameError::ExternalQuery)` - On spawn failure or non-zero exit
pub fn run_git<P: AsRef<Path>, S: AsRef<str>>(cwd: P, args: &[S]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();
    let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
    let command = args.first().copied().unwrap_or("").to_string();

    let output = Command::new("git")
        .current_dir(cwd)
        .args(&args)
        .output()
        .map_err(|e| DifflameError::ExternalQuery {
            command: command.clone(),
            status: -1,
            message: format!("failed to execute git: {}", e),
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let message = if git_output.stderr.is_empty() {
            git_output.stdout.trim().to_string()
        } else {
            git_output.stderr.clone()
        };

        Err(DifflameError::ExternalQuery {
            command,
            status: output.status.code().unwrap_or(-1),
            message,
        })
    }
}

/// Get the repository root directory using `git rev-parse --show-toplevel`.
///
/// Being outside a repository is a user error (exit 1), not a git failure.
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    match run_git(cwd.as_ref(), &["rev-parse", "--show-toplevel"]) {
        Ok(output) => Ok(PathBuf::from(output.trimmed())),
        Err(DifflameError::ExternalQuery { message, .. })
            if message.contains("not a git repository") =>
        {
            Err(DifflameError::UserError(
                "not inside a git repository. Run difflame from within a git repository."
                    .to_string(),
            ))
        }
        Err(DifflameError::ExternalQuery { status: -1, message, .. }) => Err(
            DifflameError::UserError(format!("{} (is git installed?)", message)),
        ),
        Err(e) => Err(e),
    }
}

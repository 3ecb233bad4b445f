//! Repository context resolution for difflame.
//!
//! Finds the Git repository root from any working directory and translates
//! user-supplied paths (relative to where difflame was invoked) into the
//! repo-relative pathspecs every query runs with.

use crate::error::{DifflameError, Result};
use crate::git;
use std::env;
use std::path::{Component, Path, PathBuf};

/// Where difflame runs.
#[derive(Debug, Clone)]
pub struct RepoContext {
    /// Absolute path to the repository's top-level directory.
    pub repo_root: PathBuf,

    /// Invocation directory relative to `repo_root`, with a trailing slash,
    /// or empty at the top level (`git rev-parse --show-prefix`).
    pub prefix: String,
}

impl RepoContext {
    /// Resolve the context from the current working directory.
    ///
    /// # Returns
    ///
    /// * `Ok(RepoContext)` - Successfully resolved context
    /// * `Err(DifflameError::UserError)` - If not in a git repository (exit code 1)
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            DifflameError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd)
    }

    /// Resolve the context from a specific directory.
    pub fn resolve_from<P: AsRef<Path>>(cwd: P) -> Result<Self> {
        let cwd = cwd.as_ref();
        let repo_root = git::get_repo_root(cwd)?;
        let prefix = git::run_git(cwd, &["rev-parse", "--show-prefix"])?
            .trimmed()
            .to_string();

        Ok(Self { repo_root, prefix })
    }

    /// Translate a path given relative to the invocation directory into a
    /// repo-relative one. Paths that leave the repository are rejected.
    pub fn pathspec(&self, path: &str) -> Result<String> {
        let mut parts: Vec<String> = Vec::new();
        let joined = Path::new(&self.prefix).join(path);

        for component in joined.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(outside_repository(path));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(outside_repository(path));
                }
            }
        }

        if parts.is_empty() {
            Ok(".".to_string())
        } else {
            Ok(parts.join("/"))
        }
    }
}

fn outside_repository(path: &str) -> DifflameError {
    DifflameError::UserError(format!("path '{}' is outside the repository", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DirGuard, create_test_repo};
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_from_repo_root() {
        let repo = create_test_repo();
        let ctx = RepoContext::resolve_from(repo.path()).unwrap();

        let expected = repo.path().canonicalize().unwrap();
        assert_eq!(ctx.repo_root.canonicalize().unwrap(), expected);
        assert_eq!(ctx.prefix, "");
    }

    #[test]
    fn test_resolve_from_subdirectory() {
        let repo = create_test_repo();
        let subdir = repo.path().join("src").join("nested");
        std::fs::create_dir_all(&subdir).unwrap();

        let ctx = RepoContext::resolve_from(&subdir).unwrap();
        assert_eq!(
            ctx.repo_root.canonicalize().unwrap(),
            repo.path().canonicalize().unwrap()
        );
        assert_eq!(ctx.prefix, "src/nested/");
    }

    #[test]
    fn test_resolve_outside_repository_is_user_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = RepoContext::resolve_from(temp_dir.path()).unwrap_err();
        assert!(matches!(err, DifflameError::UserError(_)));
        assert!(err.to_string().contains("not inside a git repository"));
    }

    #[test]
    #[serial]
    fn test_resolve_uses_current_directory() {
        let repo = create_test_repo();
        let subdir = repo.path().join("docs");
        std::fs::create_dir_all(&subdir).unwrap();

        let _guard = DirGuard::new(&subdir);
        let ctx = RepoContext::resolve().unwrap();
        assert_eq!(ctx.prefix, "docs/");
    }

    #[test]
    fn test_pathspec() {
        let ctx = RepoContext {
            repo_root: PathBuf::from("/repo"),
            prefix: "src/nested/".to_string(),
        };

        assert_eq!(ctx.pathspec("lib.rs").unwrap(), "src/nested/lib.rs");
        assert_eq!(ctx.pathspec("./a/b.rs").unwrap(), "src/nested/a/b.rs");
        assert_eq!(ctx.pathspec("../other.rs").unwrap(), "src/other.rs");
        assert_eq!(ctx.pathspec("../..").unwrap(), ".");
        assert!(ctx.pathspec("../../../escape").is_err());
        assert!(ctx.pathspec("/etc/passwd").is_err());
    }

    #[test]
    fn test_pathspec_at_top_level() {
        let ctx = RepoContext {
            repo_root: PathBuf::from("/repo"),
            prefix: String::new(),
        };
        assert_eq!(ctx.pathspec("README.md").unwrap(), "README.md");
        assert_eq!(ctx.pathspec(".").unwrap(), ".");
    }
}

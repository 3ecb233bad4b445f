use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A throwaway repository whose commits get strictly increasing, pinned
/// timestamps so ids and rendered output are reproducible.
pub(crate) struct TestRepo {
    dir: TempDir,
    clock: u64,
}

impl TestRepo {
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path();

        git(path, &["init", "--quiet"], None);
        // Ensure the repo uses a deterministic default branch name across environments.
        git(path, &["symbolic-ref", "HEAD", "refs/heads/main"], None);
        git(path, &["config", "user.email", "test@example.com"], None);
        git(path, &["config", "user.name", "Test User"], None);
        git(path, &["config", "commit.gpgsign", "false"], None);

        Self {
            dir,
            clock: 1_700_000_000,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn write(&self, file: &str, content: &str) {
        let full = self.path().join(file);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    /// Write the given lines (newline-terminated) into `file`.
    pub(crate) fn write_lines(&self, file: &str, lines: &[&str]) {
        let mut content = lines.join("\n");
        content.push('\n');
        self.write(file, &content);
    }

    /// Stage everything and commit, returning the full commit id.
    pub(crate) fn commit(&mut self, message: &str) -> String {
        self.run(&["add", "-A"]);
        self.run(&["commit", "--quiet", "--allow-empty", "-m", message]);
        self.head()
    }

    pub(crate) fn head(&self) -> String {
        self.run_output(&["rev-parse", "HEAD"])
    }

    pub(crate) fn checkout(&mut self, rev: &str) {
        self.run(&["checkout", "--quiet", rev]);
    }

    pub(crate) fn branch(&mut self, name: &str, start: &str) {
        self.run(&["checkout", "--quiet", "-b", name, start]);
    }

    pub(crate) fn tag(&mut self, name: &str, rev: &str) {
        self.run(&["tag", name, rev]);
    }

    /// Merge `other` into the current branch with a real merge commit.
    pub(crate) fn merge(&mut self, other: &str, message: &str) -> String {
        self.run(&["merge", "--quiet", "--no-ff", "--no-edit", "-m", message, other]);
        self.head()
    }

    pub(crate) fn run(&mut self, args: &[&str]) {
        self.clock += 60;
        let date = format!("{} +0000", self.clock);
        git(self.dir.path(), args, Some(&date));
    }

    fn run_output(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .current_dir(self.path())
            .args(args)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

pub(crate) fn create_test_repo() -> TestRepo {
    let mut repo = TestRepo::new();
    repo.write("README.md", "# Test\n");
    repo.commit("Initial commit");
    repo
}

fn git(repo_dir: &Path, args: &[&str], date: Option<&str>) {
    let mut command = Command::new("git");
    command.current_dir(repo_dir).args(args);
    if let Some(date) = date {
        command
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date);
    }

    let output = command
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }
}

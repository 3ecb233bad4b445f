use super::*;
use crate::error::DifflameError;
use crate::test_support::{TestRepo, create_test_repo};
use clap::Parser;
use tempfile::TempDir;

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["difflame"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn run_in(repo: &TestRepo, args: &[&str]) -> Result<String> {
    let ctx = RepoContext::resolve_from(repo.path())?;
    let mut out = Vec::new();
    execute(&cli(args), &ctx, false, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

/// v1: a b c; c replaced by X; Y appended (HEAD).
fn history() -> (TestRepo, String, String) {
    let mut repo = create_test_repo();
    repo.write_lines("f.txt", &["a", "b", "c"]);
    let v1 = repo.commit("v1");
    repo.tag("v1", &v1);
    repo.write_lines("f.txt", &["a", "b", "X"]);
    let replace = repo.commit("replace c with X");
    repo.write_lines("f.txt", &["a", "b", "X", "Y"]);
    repo.commit("append Y");
    (repo, v1, replace)
}

#[test]
fn test_run_renders_annotated_diff() {
    let (repo, v1, replace) = history();
    let output = run_in(&repo, &["--no-date", "--diff-param", "-U1", "v1..HEAD"]).unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "diff --git a/f.txt b/f.txt");
    assert!(lines.iter().any(|l| l.starts_with("@@ -2,2 +2,3 @@")));
    assert!(lines.contains(&format!(" {} (Test User 2 2) b", &v1[..8]).as_str()));
    assert!(lines.contains(&format!("-{} (Test User 3  ) c", &replace[..8]).as_str()));
    assert!(lines.contains(&format!("    {}: replace c with X", &replace[..8]).as_str()));
    assert!(lines.contains(&format!("+{} (Test User   3) X", &replace[..8]).as_str()));
}

#[test]
fn test_run_single_revision_compares_with_head() {
    let (repo, _, _) = history();
    let range = run_in(&repo, &["--no-hints", "v1..HEAD"]).unwrap();
    let single = run_in(&repo, &["--no-hints", "v1"]).unwrap();
    assert_eq!(range, single);
}

#[test]
fn test_run_output_is_reproducible() {
    let (repo, _, _) = history();
    let first = run_in(&repo, &["--mail", "v1", "HEAD"]).unwrap();
    let second = run_in(&repo, &["--mail", "v1", "HEAD"]).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("<test@example.com>"));
}

#[test]
fn test_run_reads_repo_config() {
    let (repo, _, replace) = history();
    repo.write(".difflame.yaml", "abbrev: 12\nhints: false\nshow_date: false\n");

    let output = run_in(&repo, &["v1"]).unwrap();
    assert!(output.contains(&format!("+{} (Test User", &replace[..12])));
    assert!(!output.contains(": replace c with X"));
}

#[test]
fn test_run_writes_trace_events() {
    let (repo, _, _) = history();
    let temp_dir = TempDir::new().unwrap();
    let trace = temp_dir.path().join("trace.ndjson");

    run_in(&repo, &["--trace", trace.to_str().unwrap(), "v1"]).unwrap();

    let content = std::fs::read_to_string(&trace).unwrap();
    let actions: Vec<String> = content
        .lines()
        .map(|l| {
            let value: serde_json::Value = serde_json::from_str(l).unwrap();
            value["action"].as_str().unwrap().to_string()
        })
        .collect();
    assert!(actions.iter().any(|a| a == "query"));
    assert!(actions.iter().any(|a| a == "file"));
}

#[test]
fn test_run_unknown_revision_is_user_error() {
    let (repo, _, _) = history();
    let err = run_in(&repo, &["no-such-rev"]).unwrap_err();
    assert!(matches!(err, DifflameError::UserError(_)));
    assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
}

#[test]
fn test_run_invalid_diff_param_is_git_failure() {
    let (repo, _, _) = history();
    let err = run_in(&repo, &["--diff-param", "--no-such-option", "v1"]).unwrap_err();
    assert!(matches!(err, DifflameError::ExternalQuery { .. }));
    assert_eq!(err.exit_code(), crate::exit_codes::GIT_FAILURE);
}

// ============================================================================
// Settings::merge
// ============================================================================

fn context(prefix: &str) -> RepoContext {
    RepoContext {
        repo_root: PathBuf::from("/repo"),
        prefix: prefix.to_string(),
    }
}

#[test]
fn test_merge_command_line_overrides_config() {
    let config = Config::from_yaml(
        "show_mail: true\nhints: false\ndiff_options: -w\nblame_options: -M\nexclude: ['*.lock']\n",
    )
    .unwrap();
    let cli = cli(&[
        "--no-mail",
        "--hints",
        "--diff-param",
        "-U1",
        "v1..v2",
        "--",
        "lib.rs",
    ]);

    let settings = Settings::merge(&config, &cli, &context("src/"), false).unwrap();
    assert_eq!(settings.request.start, "v1");
    assert_eq!(settings.request.target, "v2");
    assert_eq!(settings.request.paths, vec!["src/lib.rs"]);
    assert_eq!(settings.request.diff_params, vec!["-w", "-U1"]);
    assert_eq!(settings.request.blame_params, vec!["-M"]);
    assert!(settings.request.exclude.is_some());
    assert!(!settings.render.show_mail);
    assert!(settings.render.hints);
    assert!(settings.render.show_name);
}

#[test]
fn test_merge_color_follows_terminal_unless_forced() {
    let config = Config::default();

    let auto = Settings::merge(&config, &cli(&["v1"]), &context(""), true).unwrap();
    assert!(auto.render.color);
    let piped = Settings::merge(&config, &cli(&["v1"]), &context(""), false).unwrap();
    assert!(!piped.render.color);
    let forced = Settings::merge(&config, &cli(&["--no-color", "v1"]), &context(""), true).unwrap();
    assert!(!forced.render.color);
}

#[test]
fn test_merge_trace_file_locations() {
    let config = Config::from_yaml("trace_file: logs/trace.ndjson\n").unwrap();

    let from_config = Settings::merge(&config, &cli(&["v1"]), &context(""), false).unwrap();
    assert_eq!(
        from_config.trace_file,
        Some(PathBuf::from("/repo/logs/trace.ndjson"))
    );

    let from_cli =
        Settings::merge(&config, &cli(&["--trace", "mine.ndjson", "v1"]), &context(""), false)
            .unwrap();
    assert_eq!(from_cli.trace_file, Some(PathBuf::from("mine.ndjson")));
}

#[test]
fn test_merge_rejects_paths_outside_repository() {
    let err = Settings::merge(
        &Config::default(),
        &cli(&["v1", "--", "../../etc"]),
        &context("src/"),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, DifflameError::UserError(_)));
}

//! Tests for config functionality.

use crate::config::{CONFIG_FILE_NAME, ColorMode, Config};
use crate::error::DifflameError;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.color, ColorMode::Auto);
    assert!(config.show_name);
    assert!(!config.show_mail);
    assert!(config.show_date);
    assert!(config.hints);
    assert_eq!(config.abbrev, 8);
    assert!(config.diff_options.is_empty());
    assert!(config.blame_options.is_empty());
    assert!(config.exclude.is_empty());
    assert!(config.trace_file.is_none());
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();

    // Should use all defaults
    assert_eq!(config.abbrev, 8);
    assert!(config.hints);
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
show_mail: true
abbrev: 12
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert!(config.show_mail);
    assert_eq!(config.abbrev, 12);

    // Unspecified values should use defaults
    assert!(config.show_name);
    assert_eq!(config.color, ColorMode::Auto);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
color: always
show_name: false
show_mail: true
show_date: false
hints: false
abbrev: 10
diff_options: "-U1 --diff-algorithm=histogram"
blame_options: "-w -M"
exclude:
  - "vendor/**"
  - "*.lock"
trace_file: /tmp/difflame.ndjson
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.color, ColorMode::Always);
    assert!(!config.show_name);
    assert!(config.show_mail);
    assert!(!config.show_date);
    assert!(!config.hints);
    assert_eq!(config.abbrev, 10);
    assert_eq!(
        config.diff_params().unwrap(),
        vec!["-U1", "--diff-algorithm=histogram"]
    );
    assert_eq!(config.blame_params().unwrap(), vec!["-w", "-M"]);
    assert_eq!(
        config.trace_file.as_deref(),
        Some(std::path::Path::new("/tmp/difflame.ndjson"))
    );

    let exclude = config.exclude_globset().unwrap().unwrap();
    assert!(exclude.is_match("vendor/lib/a.rs"));
    assert!(exclude.is_match("Cargo.lock"));
    assert!(!exclude.is_match("src/main.rs"));
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
abbrev: 9
future_option: 42
nested:
  anything: true
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.abbrev, 9);
}

#[test]
fn test_quoted_options_are_split_like_a_shell() {
    let config = Config::from_yaml(r#"diff_options: "--word-diff-regex='[a-z ]+' -U2""#).unwrap();
    assert_eq!(
        config.diff_params().unwrap(),
        vec!["--word-diff-regex=[a-z ]+", "-U2"]
    );
}

#[test]
fn test_invalid_abbrev_rejected() {
    for yaml in ["abbrev: 3", "abbrev: 41"] {
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, DifflameError::UserError(_)));
        assert!(err.to_string().contains("abbrev"));
    }
}

#[test]
fn test_invalid_color_rejected() {
    let err = Config::from_yaml("color: sometimes").unwrap_err();
    assert!(matches!(err, DifflameError::UserError(_)));
}

#[test]
fn test_unbalanced_quotes_rejected() {
    let err = Config::from_yaml(r#"blame_options: "-w 'oops""#).unwrap_err();
    assert!(err.to_string().contains("blame_options"));
}

#[test]
fn test_invalid_glob_rejected() {
    let err = Config::from_yaml("exclude: ['src/[unclosed']").unwrap_err();
    assert!(err.to_string().contains("invalid glob pattern in exclude"));
}

#[test]
fn test_no_exclude_means_no_globset() {
    assert!(Config::default().exclude_globset().unwrap().is_none());
}

#[test]
fn test_color_mode() {
    assert!(ColorMode::Auto.enabled(true));
    assert!(!ColorMode::Auto.enabled(false));
    assert!(ColorMode::Always.enabled(false));
    assert!(!ColorMode::Never.enabled(true));
}

#[test]
fn test_yaml_roundtrip() {
    let config = Config {
        abbrev: 12,
        exclude: vec!["docs/**".to_string()],
        ..Default::default()
    };
    let yaml = config.to_yaml().unwrap();
    let parsed = Config::from_yaml(&yaml).unwrap();
    assert_eq!(parsed.abbrev, 12);
    assert_eq!(parsed.exclude, vec!["docs/**"]);
}

#[test]
fn test_discover_defaults_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::discover_with(temp_dir.path(), None).unwrap();
    assert_eq!(config.abbrev, 8);
}

#[test]
fn test_discover_reads_repo_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "abbrev: 16\n").unwrap();

    let config = Config::discover_with(temp_dir.path(), None).unwrap();
    assert_eq!(config.abbrev, 16);
}

#[test]
fn test_discover_prefers_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "abbrev: 16\n").unwrap();
    let explicit = temp_dir.path().join("other.yaml");
    std::fs::write(&explicit, "abbrev: 20\n").unwrap();

    let config = Config::discover_with(temp_dir.path(), Some(&explicit)).unwrap();
    assert_eq!(config.abbrev, 20);
}

#[test]
fn test_discover_missing_explicit_path_is_user_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.yaml");

    let err = Config::discover_with(temp_dir.path(), Some(&missing)).unwrap_err();
    assert!(matches!(err, DifflameError::UserError(_)));
    assert!(err.to_string().contains("failed to read config file"));
}

//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::ABBREV_RANGE;
use crate::diff::helpers::normalize_path;
use crate::error::{DifflameError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DIFFLAME_CONFIG";

/// Config file looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = ".difflame.yaml";

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(DifflameError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            DifflameError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load the effective config for a repository.
    ///
    /// `$DIFFLAME_CONFIG` wins when set (and must exist); otherwise
    /// `<repo_root>/.difflame.yaml` is used if present, else the defaults.
    pub fn discover(repo_root: &Path) -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::discover_with(repo_root, explicit.as_deref())
    }

    /// Same as [`Config::discover`] with the explicit path passed in.
    pub fn discover_with(repo_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let local = repo_root.join(CONFIG_FILE_NAME);
        if local.is_file() {
            Self::load(local)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            DifflameError::UserError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            DifflameError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `abbrev` must be within 4..=40
    /// - `diff_options` and `blame_options` must be valid shell-words
    /// - `exclude` entries must be valid globs
    pub fn validate(&self) -> Result<()> {
        if !ABBREV_RANGE.contains(&self.abbrev) {
            return Err(DifflameError::UserError(format!(
                "config validation failed: abbrev must be between {} and {} (found {})",
                ABBREV_RANGE.start(),
                ABBREV_RANGE.end(),
                self.abbrev
            )));
        }

        split_options(&self.diff_options, "diff_options")?;
        split_options(&self.blame_options, "blame_options")?;
        build_globset(&self.exclude, "exclude")?;

        Ok(())
    }

    /// `diff_options` split into arguments.
    pub fn diff_params(&self) -> Result<Vec<String>> {
        split_options(&self.diff_options, "diff_options")
    }

    /// `blame_options` split into arguments.
    pub fn blame_params(&self) -> Result<Vec<String>> {
        split_options(&self.blame_options, "blame_options")
    }

    /// Compiled `exclude` patterns, or `None` when there are none.
    pub fn exclude_globset(&self) -> Result<Option<GlobSet>> {
        if self.exclude.is_empty() {
            return Ok(None);
        }
        build_globset(&self.exclude, "exclude").map(Some)
    }
}

fn split_options(options: &str, field_name: &str) -> Result<Vec<String>> {
    shell_words::split(options).map_err(|e| {
        DifflameError::UserError(format!(
            "config validation failed: {} is not valid shell syntax: {}",
            field_name, e
        ))
    })
}

/// Build a GlobSet from a list of glob patterns.
pub fn build_globset(patterns: &[String], field_name: &str) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let normalized_pattern = normalize_path(pattern);
        let glob = Glob::new(&normalized_pattern).map_err(|e| {
            DifflameError::UserError(format!(
                "invalid glob pattern in {}: '{}' - {}",
                field_name, pattern, e
            ))
        })?;
        builder.add(glob);
    }

    builder.build().map_err(|e| {
        DifflameError::UserError(format!("failed to compile {} globs: {}", field_name, e))
    })
}

//! Configuration types and defaults for difflame.

use serde::{Deserialize, Serialize};

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Color when stdout is a terminal (default).
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Whether to color output written to a stream that is (or is not) a
    /// terminal.
    pub fn enabled(&self, is_terminal: bool) -> bool {
        match self {
            Self::Auto => is_terminal,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Shortest and longest accepted `abbrev`.
pub const ABBREV_RANGE: std::ops::RangeInclusive<usize> = 4..=40;

// Default value functions for serde
pub(crate) fn default_abbrev() -> usize {
    8
}
pub(crate) fn default_true() -> bool {
    true
}

//! Unified diff parsing for difflame.
//!
//! Turns raw `git diff` output into `DiffFile` records, each holding its
//! hunks with original/final ranges and tagged raw lines. The same parser
//! serves the top-level range diff and the zero-context diffs the
//! line-migration resolver requests for ancestor pairs.

mod api;
pub(crate) mod helpers;
mod model;
mod parser;


// Re-export public API
pub use api::{migration_diff_args, range_diff_args};
pub use model::{DiffFile, DiffHunk, HunkRange, RawLine, RawLineKind};
pub use parser::{DiffParser, parse_diff};

//! Attribution reader.
//!
//! Wraps `git blame --line-porcelain` for explicit line ranges, forward at a
//! revision or reverse over a revision range.

mod api;
mod parser;
mod types;


pub use api::{AttributionQuery, query_attribution};
pub use parser::parse_line_porcelain;
pub use types::AttributionEntry;

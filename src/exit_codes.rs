//! Exit code constants for the difflame CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown revision, invalid config)
//! - 2: Malformed diff or attribution output
//! - 3: Git operation failure
//! - 4: Diff and attribution streams out of sync

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown revision, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Output from git could not be parsed (diff or blame).
pub const MALFORMED_OUTPUT: i32 = 2;

/// Git operation failure: a query exited non-zero or could not be spawned.
pub const GIT_FAILURE: i32 = 3;

/// A hunk and its attribution streams disagree on line counts.
pub const DESYNC_FAILURE: i32 = 4;

//! Error types for the difflame CLI.
//!
//! Uses thiserror for derive macros. Every error is fatal for the run; the
//! only non-error "failure" is an inconclusive deletion resolution, which is
//! modelled as `Option::None` by the resolver.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for difflame operations.
#[derive(Error, Debug)]
pub enum DifflameError {
    /// User provided invalid arguments, an unknown revision, or bad config.
    #[error("{0}")]
    UserError(String),

    /// Unified diff output could not be parsed.
    #[error("Malformed diff: {0}")]
    MalformedDiff(String),

    /// Line-porcelain blame output could not be parsed.
    #[error("Malformed attribution output: {0}")]
    MalformedAttribution(String),

    /// An external git query failed.
    #[error("git {command} failed (exit code {status}): {message}")]
    ExternalQuery {
        command: String,
        status: i32,
        message: String,
    },

    /// Hunk lines and attribution entries disagree.
    #[error("Attribution out of sync: {0}")]
    Desync(String),
}

impl DifflameError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DifflameError::UserError(_) => exit_codes::USER_ERROR,
            DifflameError::MalformedDiff(_) => exit_codes::MALFORMED_OUTPUT,
            DifflameError::MalformedAttribution(_) => exit_codes::MALFORMED_OUTPUT,
            DifflameError::ExternalQuery { .. } => exit_codes::GIT_FAILURE,
            DifflameError::Desync(_) => exit_codes::DESYNC_FAILURE,
        }
    }
}

/// Result type alias for difflame operations.
pub type Result<T> = std::result::Result<T, DifflameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = DifflameError::UserError("unknown revision".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn parse_errors_share_exit_code() {
        let diff = DifflameError::MalformedDiff("bad hunk".to_string());
        let blame = DifflameError::MalformedAttribution("bad header".to_string());
        assert_eq!(diff.exit_code(), exit_codes::MALFORMED_OUTPUT);
        assert_eq!(blame.exit_code(), exit_codes::MALFORMED_OUTPUT);
    }

    #[test]
    fn external_query_error_has_correct_exit_code() {
        let err = DifflameError::ExternalQuery {
            command: "blame".to_string(),
            status: 128,
            message: "fatal: no such path".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::GIT_FAILURE);
    }

    #[test]
    fn desync_error_has_correct_exit_code() {
        let err = DifflameError::Desync("final stream exhausted".to_string());
        assert_eq!(err.exit_code(), exit_codes::DESYNC_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = DifflameError::ExternalQuery {
            command: "diff".to_string(),
            status: 129,
            message: "usage".to_string(),
        };
        assert_eq!(err.to_string(), "git diff failed (exit code 129): usage");

        let err = DifflameError::MalformedDiff("expected +++ after ---".to_string());
        assert_eq!(err.to_string(), "Malformed diff: expected +++ after ---");
    }
}

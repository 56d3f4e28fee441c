//! Target tracker error types.

use thiserror::Error;

/// Errors from the target tracker.
///
/// Issue creation failures are recoverable at ticket granularity (the
/// ticket is marked failed, nothing further is attempted for it); comment
/// creation failures are recoverable at transaction granularity.
#[derive(Debug, Error)]
pub enum TargetError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// Issue creation was refused.
    #[error("could not create issue '{title}': {reason}")]
    IssueCreate { title: String, reason: String },

    /// Comment creation was refused.
    #[error("could not create comment on issue #{issue}: {reason}")]
    CommentCreate { issue: u64, reason: String },
}

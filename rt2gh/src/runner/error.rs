//! Runner error types.

use thiserror::Error;

/// Errors that abort a run. All of them occur before the first mutation;
/// per-ticket and per-comment failures are recorded in the summary
/// instead of raised here.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Unusable configuration.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Candidate listing failed (queue search).
    #[error("could not collect candidate tickets: {0}")]
    CandidateListing(#[from] crate::source::SourceError),

    /// Migrated-id listing failed (open-issue pagination).
    #[error("could not list existing issues: {0}")]
    TargetListing(#[from] crate::target::TargetError),

    /// GitHub client construction failed.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),
}

//! Source tracker error types.

use thiserror::Error;

/// Errors from the source tracker.
///
/// Fetch and correspondence errors are recoverable at ticket granularity;
/// the executor logs them and moves on to the next ticket. Search errors
/// surface at planning time and abort the run before any mutation.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A queue search failed.
    #[error("search failed for queue '{queue}': {reason}")]
    Search { queue: String, reason: String },

    /// A ticket could not be fetched (missing, access denied, malformed).
    #[error("ticket #{id} could not be fetched: {reason}")]
    TicketFetch { id: u64, reason: String },

    /// The back-reference correspondence could not be appended.
    #[error("could not append correspondence to ticket #{id}: {reason}")]
    Correspondence { id: u64, reason: String },

    /// HTTP transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

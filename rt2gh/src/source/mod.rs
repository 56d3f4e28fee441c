//! Source tracker (RT) capability boundary.
//!
//! The migration core only ever talks to the source tracker through the
//! [`SourceTracker`] trait; [`RtClient`] is the thin REST 1.0 wrapper used
//! in production, and tests substitute in-memory fakes.

mod error;
mod rt;
mod ticket;

pub use error::SourceError;
pub use rt::RtClient;
pub use ticket::{Ticket, Transaction, NO_CONTENT_SENTINEL};

use async_trait::async_trait;
use tracing::info;

/// Ticket statuses considered still open on the source tracker.
pub const OPEN_STATUSES: [&str; 3] = ["new", "open", "stalled"];

/// Read/write capability the migration core needs from the source tracker.
#[async_trait]
pub trait SourceTracker: Send + Sync {
    /// Searches a queue for tickets in any of the given statuses.
    async fn search(&self, queue: &str, statuses: &[&str]) -> Result<Vec<u64>, SourceError>;

    /// Fetches a ticket with its full transaction history.
    async fn fetch(&self, ticket_id: u64) -> Result<Ticket, SourceError>;

    /// Appends a correspondence entry to a ticket.
    async fn append_correspondence(&self, ticket_id: u64, message: &str)
        -> Result<(), SourceError>;
}

/// Collects the candidate ticket ids for a run.
///
/// Explicit ids are returned verbatim: order preserved, no dedup against
/// the tracker. Otherwise each queue is searched for open tickets and the
/// results are concatenated in queue order. A ticket sitting in two queues
/// shows up twice here; the planner drops the duplicate.
///
/// # Errors
///
/// Returns the first [`SourceError`] hit while searching a queue. This
/// happens at planning time, before any mutation, so aborting is safe.
pub async fn list_candidate_ids<S>(
    source: &S,
    explicit_ids: &[u64],
    queues: &[String],
) -> Result<Vec<u64>, SourceError>
where
    S: SourceTracker + ?Sized,
{
    if !explicit_ids.is_empty() {
        return Ok(explicit_ids.to_vec());
    }

    let mut ids = Vec::new();
    for queue in queues {
        let found = source.search(queue, &OPEN_STATUSES).await?;
        info!(queue = %queue, count = found.len(), "Queue search complete");
        ids.extend(found);
    }
    Ok(ids)
}

//! Per-ticket outcome types.

use crate::target::CreatedIssue;
use serde::Serialize;

/// Terminal state of one processed ticket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TicketOutcome {
    /// The issue was created; comment replay may have partially failed,
    /// which is an accepted, recoverable state.
    Migrated {
        /// Source ticket id.
        ticket_id: u64,
        /// The created issue.
        issue: CreatedIssue,
        /// Comments successfully replayed.
        comments_created: usize,
        /// Comments that failed to replay (logged with their content).
        comments_failed: usize,
    },

    /// Dry-run mode: the payload was computed and reported, nothing was
    /// created.
    DryRun {
        /// Source ticket id.
        ticket_id: u64,
        /// Title the issue would have carried.
        title: String,
        /// Comments that would have been created.
        comment_count: usize,
    },

    /// The ticket could not be migrated; the run continues with the next
    /// one.
    Failed {
        /// Source ticket id.
        ticket_id: u64,
        /// What went wrong.
        error: String,
    },
}

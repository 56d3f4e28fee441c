//! Orchestrates a full migration run.
//!
//! Tickets are processed strictly one at a time, in plan order. No
//! failure at ticket or transaction granularity ever aborts the run; the
//! only fatal errors are configuration problems and the candidate/dedup
//! listings, all of which happen before the first mutation.

mod error;

pub use error::RunnerError;

use crate::backref;
use crate::config::MigratorConfig;
use crate::payload::{build_issue, comment_body};
use crate::planner::plan;
use crate::source::{list_candidate_ids, SourceTracker, Ticket, Transaction};
use crate::summary::{RunSummary, TicketOutcome};
use crate::target::{list_migrated_ids, CreatedIssue, NewIssue, TargetError, TargetTracker};
use tracing::{error, info, info_span, warn, Instrument};

/// Drives the migration pipeline against a source and a target tracker.
pub struct Runner<S, T> {
    config: MigratorConfig,
    source: S,
    target: T,
}

impl<S, T> Runner<S, T>
where
    S: SourceTracker,
    T: TargetTracker,
{
    /// Builds a runner after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] for an unusable configuration.
    pub fn new(config: MigratorConfig, source: S, target: T) -> Result<Self, RunnerError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            target,
        })
    }

    /// Executes the full run and returns its summary.
    ///
    /// Interrupting between tickets is safe: dedup state is re-derived
    /// from the target's open issues, so the next run resumes at the
    /// first non-migrated id.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] only for failures before the first
    /// mutation (candidate listing, migrated-id listing). Per-ticket
    /// failures are folded into the summary instead.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());

        let candidates =
            list_candidate_ids(&self.source, self.config.ticket_ids(), self.config.queues())
                .await?;
        info!(count = candidates.len(), "Collected candidate tickets");

        let migrated = list_migrated_ids(&self.target).await?;
        info!(count = migrated.len(), "Found already-migrated tickets");

        let planned = plan(&candidates, &migrated);
        if planned.is_empty() {
            info!("Nothing to migrate");
            return Ok(summary);
        }

        info!(count = planned.len(), dry_run = self.config.dry_run(), "Starting migration");
        summary.tickets_planned = planned.len();

        for ticket_id in planned {
            let outcome = self
                .migrate_ticket(ticket_id)
                .instrument(info_span!("migrate", ticket_id))
                .await;
            summary.record(&outcome);
        }

        Ok(summary)
    }

    /// Migrates a single ticket to its terminal outcome. Never escalates
    /// an error past the ticket boundary.
    async fn migrate_ticket(&self, ticket_id: u64) -> TicketOutcome {
        let ticket = match self.source.fetch(ticket_id).await {
            Ok(ticket) => ticket,
            Err(e) => {
                error!(error = %e, "Failed to fetch ticket, skipping");
                return TicketOutcome::Failed {
                    ticket_id,
                    error: e.to_string(),
                };
            }
        };

        let Some((description, rest)) = ticket.transactions.split_first() else {
            error!(subject = %ticket.subject, "Ticket has no transactions");
            return TicketOutcome::Failed {
                ticket_id,
                error: "ticket has no transactions".to_string(),
            };
        };

        let issue = build_issue(&ticket, description, self.config.rt_base_url());

        if self.config.dry_run() {
            return preview_ticket(&ticket, &issue, rest);
        }

        let created = match self.target.create_issue(&issue).await {
            Ok(created) => created,
            Err(e) => {
                // The full body goes to the log so an operator can retry
                // or hand-create the issue.
                error!(
                    error = %e,
                    title = %issue.title,
                    body = %issue.body,
                    "Failed to create issue, skipping ticket"
                );
                return TicketOutcome::Failed {
                    ticket_id,
                    error: e.to_string(),
                };
            }
        };
        info!(issue_number = created.number, url = %created.url, "Issue created");

        let (comments_created, comments_failed) = self.replay_transactions(&created, rest).await;

        if self.config.comment_back() {
            let message = backref::correspondence_message(&created.url);
            if let Err(e) = self.source.append_correspondence(ticket_id, &message).await {
                warn!(error = %e, "Could not leave back-reference on source ticket");
            }
        }

        info!(subject = %ticket.subject, "Ticket migrated");
        TicketOutcome::Migrated {
            ticket_id,
            issue: created,
            comments_created,
            comments_failed,
        }
    }

    /// Replays the non-description transactions as comments, in original
    /// order. A failed comment is logged with its content and replay
    /// continues; the issue already exists and partial replay is an
    /// acceptable, recoverable state.
    async fn replay_transactions(
        &self,
        created: &CreatedIssue,
        transactions: &[Transaction],
    ) -> (usize, usize) {
        let mut comments_created = 0;
        let mut comments_failed = 0;
        let mut first_attempt = true;

        for transaction in transactions {
            if !transaction.has_content() {
                continue;
            }
            let body = comment_body(transaction);
            let result = if first_attempt {
                self.create_first_comment(created.number, &body).await
            } else {
                self.target.create_comment(created.number, &body).await
            };
            first_attempt = false;

            match result {
                Ok(()) => comments_created += 1,
                Err(e) => {
                    warn!(
                        error = %e,
                        content = %transaction.content,
                        "Failed to create comment, continuing replay"
                    );
                    comments_failed += 1;
                }
            }
        }

        (comments_created, comments_failed)
    }

    /// Creates the first comment on a freshly created issue.
    ///
    /// The target's read paths can lag issue creation, so the first
    /// attempt retries with exponential backoff instead of failing
    /// outright.
    async fn create_first_comment(
        &self,
        issue_number: u64,
        body: &str,
    ) -> Result<(), TargetError> {
        let mut delay = self.config.first_comment_delay();
        let mut attempt = 0u32;

        loop {
            match self.target.create_comment(issue_number, body).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.config.first_comment_retries() => {
                    attempt += 1;
                    warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "First comment failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Reports what would be created for one ticket without touching either
/// tracker.
fn preview_ticket(ticket: &Ticket, issue: &NewIssue, rest: &[Transaction]) -> TicketOutcome {
    println!(
        "[DRY RUN] ticket #{}: would create issue \"{}\"",
        ticket.id, issue.title
    );
    println!("  labels: {}", issue.labels.join(", "));

    let mut comment_count = 0;
    for transaction in rest {
        if !transaction.has_content() {
            continue;
        }
        let body = comment_body(transaction);
        println!("  would create comment ({} bytes)", body.len());
        comment_count += 1;
    }

    TicketOutcome::DryRun {
        ticket_id: ticket.id,
        title: issue.title.clone(),
        comment_count,
    }
}

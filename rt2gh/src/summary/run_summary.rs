//! Whole-run accounting.

use super::outcome::TicketOutcome;

/// Summary of a complete migration run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Tickets in the computed plan.
    pub tickets_planned: usize,

    /// Issues successfully created.
    pub issues_created: usize,

    /// Tickets that failed (fetch or issue creation).
    pub tickets_failed: usize,

    /// Tickets previewed in dry-run mode.
    pub tickets_previewed: usize,

    /// Comments successfully replayed across all tickets.
    pub comments_created: usize,

    /// Comments that failed to replay across all tickets.
    pub comments_failed: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Folds one ticket outcome into the totals.
    pub fn record(&mut self, outcome: &TicketOutcome) {
        match outcome {
            TicketOutcome::Migrated {
                comments_created,
                comments_failed,
                ..
            } => {
                self.issues_created += 1;
                self.comments_created += comments_created;
                self.comments_failed += comments_failed;
            }
            TicketOutcome::DryRun { .. } => self.tickets_previewed += 1,
            TicketOutcome::Failed { .. } => self.tickets_failed += 1,
        }
    }

    /// Whether any ticket or comment failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.tickets_failed > 0 || self.comments_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::CreatedIssue;

    #[test]
    fn records_each_outcome_kind() {
        let mut summary = RunSummary::new(false);

        summary.record(&TicketOutcome::Migrated {
            ticket_id: 1,
            issue: CreatedIssue {
                number: 10,
                url: "https://github.com/o/r/issues/10".to_string(),
            },
            comments_created: 3,
            comments_failed: 1,
        });
        summary.record(&TicketOutcome::Failed {
            ticket_id: 2,
            error: "boom".to_string(),
        });

        assert_eq!(summary.issues_created, 1);
        assert_eq!(summary.comments_created, 3);
        assert_eq!(summary.comments_failed, 1);
        assert_eq!(summary.tickets_failed, 1);
        assert!(summary.has_failures());
    }

    #[test]
    fn dry_run_outcomes_count_as_previews() {
        let mut summary = RunSummary::new(true);
        summary.record(&TicketOutcome::DryRun {
            ticket_id: 1,
            title: "t".to_string(),
            comment_count: 2,
        });

        assert_eq!(summary.tickets_previewed, 1);
        assert!(!summary.has_failures());
    }
}
